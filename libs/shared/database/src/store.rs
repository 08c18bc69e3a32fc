use async_trait::async_trait;
use thiserror::Error;

use shared_models::{
    Appointment, AppointmentFilter, AppError, Doctor, DoctorPatch, User, UserPatch,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Slot already booked")]
    SlotTaken,

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Appointment is already {0}")]
    Closed(&'static str),

    #[error("Store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => AppError::NotFound(format!("{} not found", entity)),
            StoreError::SlotTaken => AppError::SlotUnavailable,
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::Closed(state) => {
                AppError::ValidationError(format!("Appointment is already {}", state))
            }
            StoreError::Backend(msg) => AppError::Database(msg),
        }
    }
}

/// Document store behind every cell.
///
/// Plain reads and writes map onto the `doctors`, `users` and `appointments`
/// collections. The workflow operations (`book_slot`, `cancel_appointment`,
/// `delete_doctor`, ...) touch more than one document and must each apply as a
/// single atomic unit: either every write lands or none does.
#[async_trait]
pub trait ClinicStore: Send + Sync {
    // ---- doctors ----

    /// Fails with [`StoreError::Duplicate`] when the email is already used.
    async fn insert_doctor(&self, doctor: Doctor) -> StoreResult<Doctor>;

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>>;

    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>>;

    /// All doctors, oldest first.
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>>;

    /// Flips `available` in place and returns the updated doctor.
    async fn toggle_availability(&self, doctor_id: &str) -> StoreResult<Option<Doctor>>;

    /// Removes the doctor's appointments, then the doctor. Returns the number
    /// of appointments removed, or `None` when the doctor does not exist.
    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Option<u64>>;

    // ---- users ----

    /// Fails with [`StoreError::Duplicate`] when the email is already used.
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<Option<User>>;

    /// Releases the slots held by the user's appointments, removes those
    /// appointments, then the user. `None` when the user does not exist.
    async fn delete_user(&self, user_id: &str) -> StoreResult<Option<u64>>;

    // ---- appointments ----

    async fn find_appointment(&self, appointment_id: &str) -> StoreResult<Option<Appointment>>;

    /// Matching appointments in insertion order.
    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>>;

    /// Inserts the appointment and marks its slot on the doctor, only if the
    /// slot is still free. [`StoreError::SlotTaken`] otherwise.
    async fn book_slot(&self, appointment: Appointment) -> StoreResult<Appointment>;

    /// Marks an open appointment cancelled and releases its slot.
    async fn cancel_appointment(&self, appointment_id: &str) -> StoreResult<Appointment>;

    /// Marks an open appointment completed. The slot stays booked.
    async fn complete_appointment(&self, appointment_id: &str) -> StoreResult<Appointment>;

    async fn set_payment_order(&self, appointment_id: &str, order_id: &str) -> StoreResult<Appointment>;

    /// Sets `payment=true` unless the appointment was cancelled.
    async fn mark_paid(&self, appointment_id: &str) -> StoreResult<Appointment>;
}
