use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub user_id: String,
    pub slot_date: String,
    pub slot_time: String,
    pub fee: f64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub payment_order_id: Option<String>,

    // Snapshot of the parties at booking time, for listings.
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub doctor_speciality: String,
    #[serde(default)]
    pub doctor_image: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub patient_email: String,

    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Neither cancelled nor completed.
    pub fn is_open(&self) -> bool {
        !self.cancelled && !self.is_completed
    }

    /// Whether the doctor's booked-slot map must list this appointment's slot.
    /// Completed appointments keep their slot; cancelled ones give it back.
    pub fn holds_slot(&self) -> bool {
        !self.cancelled
    }
}

/// Which appointments a listing should return. Empty matches all.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub doctor_id: Option<String>,
    pub user_id: Option<String>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: impl Into<String>) -> Self {
        Self {
            doctor_id: Some(doctor_id.into()),
            user_id: None,
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            doctor_id: None,
            user_id: Some(user_id.into()),
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor_id.as_deref().map_or(true, |id| appointment.doctor_id == id)
            && self.user_id.as_deref().map_or(true, |id| appointment.user_id == id)
    }
}
