use std::sync::OnceLock;

use regex::Regex;

use shared_models::AppError;

use crate::password::MIN_PASSWORD_LENGTH;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("static email regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Shared checks for new accounts: a well-formed email and a long enough password.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::ValidationError(
            "Please enter a valid email".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::ValidationError(
            "Please enter a strong password".to_string(),
        ));
    }
    Ok(())
}

/// True when any of the given fields is blank.
pub fn any_blank(fields: &[&str]) -> bool {
    fields.iter().any(|field| field.trim().is_empty())
}

/// Typed text an account owner must send to confirm deleting their profile.
pub const DELETE_CONFIRMATION: &str = "DELETE";

pub fn check_delete_confirmation(confirmation: &str) -> Result<(), AppError> {
    if confirmation != DELETE_CONFIRMATION {
        return Err(AppError::ValidationError(format!(
            "Type {} to confirm account deletion",
            DELETE_CONFIRMATION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("jane.doe@clinic.example"));
        assert!(is_valid_email("a+b@x.io"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@clinic"));
        assert!(!is_valid_email("@clinic.com"));
    }

    #[test]
    fn short_password_is_rejected() {
        assert_matches!(
            validate_credentials("a@b.com", "short"),
            Err(AppError::ValidationError(msg)) if msg == "Please enter a strong password"
        );
        assert!(validate_credentials("a@b.com", "longenough").is_ok());
    }

    #[test]
    fn blank_detection() {
        assert!(any_blank(&["name", "  "]));
        assert!(!any_blank(&["name", "x"]));
    }

    #[test]
    fn deletion_needs_the_exact_word() {
        assert!(check_delete_confirmation("DELETE").is_ok());
        assert!(check_delete_confirmation("delete").is_err());
        assert!(check_delete_confirmation(" DELETE").is_err());
        assert!(check_delete_confirmation("").is_err());
    }
}
