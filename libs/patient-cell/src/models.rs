use serde::Deserialize;
use thiserror::Error;

use shared_database::StoreError;
use shared_models::{Address, AppError};
use shared_payments::PaymentError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub address: Option<Address>,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProfileRequest {
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub appointment_id: String,
}

/// Sent back by the checkout widget once the patient has paid.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
}

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("User not found")]
    NotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("Appointment belongs to another user")]
    NotOwner,

    #[error("{0}")]
    Validation(String),

    #[error("Payment failed")]
    PaymentFailed,

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound | PatientError::AppointmentNotFound => {
                AppError::NotFound(err.to_string())
            }
            PatientError::NotOwner => AppError::Forbidden(err.to_string()),
            PatientError::Validation(msg) => AppError::ValidationError(msg),
            PatientError::PaymentFailed => AppError::ValidationError(err.to_string()),
            PatientError::Payment(e) => e.into(),
            PatientError::Store(e) => e.into(),
        }
    }
}
