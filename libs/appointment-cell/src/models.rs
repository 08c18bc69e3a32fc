use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::{AppError, Appointment};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// The patient comes from the session, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub slot_date: String,
    pub slot_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentIdRequest {
    pub appointment_id: String,
}

// ==============================================================================
// STATUS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn of(appointment: &Appointment) -> Self {
        if appointment.cancelled {
            AppointmentStatus::Cancelled
        } else if appointment.is_completed {
            AppointmentStatus::Completed
        } else {
            AppointmentStatus::Booked
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Booked => write!(f, "booked"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor Not Available")]
    DoctorNotAvailable,

    #[error("Slot {slot_time} on {slot_date} is not offered")]
    SlotNotOffered { slot_date: String, slot_time: String },

    #[error("Slot not available")]
    SlotNotAvailable,

    #[error("Appointment is already {0}")]
    InvalidStatusTransition(AppointmentStatus),

    #[error("Unauthorized action")]
    Unauthorized,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlotTaken => AppointmentError::SlotNotAvailable,
            StoreError::NotFound("Appointment") => AppointmentError::NotFound,
            StoreError::NotFound("Doctor") => AppointmentError::DoctorNotFound,
            StoreError::Closed("cancelled") => {
                AppointmentError::InvalidStatusTransition(AppointmentStatus::Cancelled)
            }
            StoreError::Closed("completed") => {
                AppointmentError::InvalidStatusTransition(AppointmentStatus::Completed)
            }
            other => AppointmentError::Store(other),
        }
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(err.to_string()),
            AppointmentError::DoctorNotAvailable
            | AppointmentError::SlotNotOffered { .. }
            | AppointmentError::InvalidStatusTransition(_) => {
                AppError::ValidationError(err.to_string())
            }
            AppointmentError::SlotNotAvailable => AppError::SlotUnavailable,
            AppointmentError::Unauthorized => AppError::Forbidden(err.to_string()),
            AppointmentError::Store(e) => e.into(),
        }
    }
}
