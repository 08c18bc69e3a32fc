use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::{Address, Appointment, AppError};

#[derive(Debug, Clone, Deserialize)]
pub struct AddDoctorRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub speciality: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub fee: f64,
    #[serde(default)]
    pub address: Address,
}

/// Fields a doctor may change on their own profile. Absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDoctorRequest {
    pub fee: Option<f64>,
    pub address: Option<Address>,
    pub available: Option<bool>,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteProfileRequest {
    #[serde(default)]
    pub confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorIdRequest {
    pub doctor_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDashboard {
    pub earnings: f64,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound(err.to_string()),
            DoctorError::Validation(msg) => AppError::ValidationError(msg),
            DoctorError::EmailTaken => AppError::Conflict(err.to_string()),
            DoctorError::Store(e) => e.into(),
            DoctorError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
