use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{ClinicStore, StoreError};
use shared_models::{AppError, Role, User};
use shared_utils::jwt::issue_token;
use shared_utils::password::{hash_password, verify_password};
use shared_utils::validation::{any_blank, validate_credentials};
use shared_utils::AppState;

use crate::models::RegisterRequest;

/// Credential checks for the three kinds of principal. Each success yields a
/// signed token carrying the principal id and role.
pub struct AuthService {
    config: AppConfig,
    store: Arc<dyn ClinicStore>,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self {
            config: state.config.clone(),
            store: state.store.clone(),
        }
    }

    fn token(&self, principal_id: &str, role: Role) -> Result<String, AppError> {
        issue_token(
            principal_id,
            role,
            &self.config.jwt_secret,
            self.config.token_ttl_hours,
        )
        .map_err(AppError::Internal)
    }

    /// The admin is not stored; it is the configured email/password pair.
    pub fn admin_login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let configured = !self.config.admin_email.is_empty() && !self.config.admin_password.is_empty();
        if !configured
            || !email.eq_ignore_ascii_case(&self.config.admin_email)
            || password != self.config.admin_password
        {
            warn!("Failed admin login for {}", email);
            return Err(AppError::InvalidCredentials);
        }

        info!("Admin logged in");
        self.token(&self.config.admin_email, Role::Admin)
    }

    pub async fn doctor_login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let doctor = self.store.find_doctor_by_email(email.trim()).await?;
        let Some(doctor) = doctor else {
            warn!("Doctor login for unknown email {}", email);
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &doctor.password_hash)? {
            warn!("Wrong password for doctor {}", doctor.id);
            return Err(AppError::InvalidCredentials);
        }

        info!("Doctor {} logged in", doctor.id);
        self.token(&doctor.id, Role::Doctor)
    }

    pub async fn patient_login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self.store.find_user_by_email(email.trim()).await?;
        let Some(user) = user else {
            warn!("Patient login for unknown email {}", email);
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Wrong password for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        self.token(&user.id, Role::Patient)
    }

    /// Creates a patient account and logs it in.
    pub async fn register_patient(&self, request: RegisterRequest) -> Result<String, AppError> {
        if any_blank(&[&request.name, &request.email, &request.password]) {
            return Err(AppError::ValidationError("Missing Details".to_string()));
        }
        validate_credentials(request.email.trim(), &request.password)?;

        let user = User::new(
            Uuid::new_v4().to_string(),
            request.name.trim().to_string(),
            request.email.trim().to_lowercase(),
            hash_password(&request.password)?,
        );

        let user = self.store.insert_user(user).await.map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::Conflict("User already exists".to_string()),
            other => other.into(),
        })?;

        info!("Registered user {}", user.id);
        self.token(&user.id, Role::Patient)
    }
}
