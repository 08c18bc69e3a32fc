//! Typed headers for the per-role bearer tokens (`token`, `dToken`, `aToken`).

use headers::{Error, Header};
use http::{HeaderName, HeaderValue};

use shared_models::Role;

/// A token header bound to the role whose tokens it carries.
pub trait RoleToken: Header {
    const ROLE: Role;

    fn token(&self) -> &str;
}

macro_rules! role_token_header {
    ($ty:ident, $name:literal, $role:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $ty(pub String);

        impl Header for $ty {
            fn name() -> &'static HeaderName {
                static NAME: HeaderName = HeaderName::from_static($name);
                &NAME
            }

            fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
            where
                I: Iterator<Item = &'i HeaderValue>,
            {
                values
                    .next()
                    .and_then(|value| value.to_str().ok())
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .map(|token| $ty(token.to_string()))
                    .ok_or_else(Error::invalid)
            }

            fn encode<E: Extend<HeaderValue>>(&self, values: &mut E) {
                if let Ok(value) = HeaderValue::from_str(&self.0) {
                    values.extend(std::iter::once(value));
                }
            }
        }

        impl RoleToken for $ty {
            const ROLE: Role = $role;

            fn token(&self) -> &str {
                &self.0
            }
        }
    };
}

role_token_header!(PatientToken, "token", Role::Patient);
role_token_header!(DoctorToken, "dtoken", Role::Doctor);
role_token_header!(AdminToken, "atoken", Role::Admin);
