use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::{
    Appointment, AppointmentFilter, Doctor, DoctorPatch, User, UserPatch,
};

use crate::store::{ClinicStore, StoreError, StoreResult};

#[derive(Default)]
struct Collections {
    doctors: Vec<Doctor>,
    users: Vec<User>,
    appointments: Vec<Appointment>,
}

impl Collections {
    fn doctor_mut(&mut self, doctor_id: &str) -> Option<&mut Doctor> {
        self.doctors.iter_mut().find(|d| d.id == doctor_id)
    }

    fn appointment_index(&self, appointment_id: &str) -> Option<usize> {
        self.appointments.iter().position(|a| a.id == appointment_id)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.doctors.iter().any(|d| d.email.eq_ignore_ascii_case(email))
            || self.users.iter().any(|u| u.email.eq_ignore_ascii_case(email))
    }
}

/// Process-local store. Every operation runs under one lock acquisition, so
/// the multi-document operations are atomic with respect to each other.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClinicStore for MemoryStore {
    async fn insert_doctor(&self, doctor: Doctor) -> StoreResult<Doctor> {
        let mut db = self.inner.write().await;
        if db.email_taken(&doctor.email) {
            return Err(StoreError::Duplicate(format!("Email {} is already registered", doctor.email)));
        }
        db.doctors.push(doctor.clone());
        Ok(doctor)
    }

    async fn find_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        let db = self.inner.read().await;
        Ok(db.doctors.iter().find(|d| d.id == doctor_id).cloned())
    }

    async fn find_doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>> {
        let db = self.inner.read().await;
        Ok(db.doctors.iter().find(|d| d.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        Ok(self.inner.read().await.doctors.clone())
    }

    async fn update_doctor(&self, doctor_id: &str, patch: DoctorPatch) -> StoreResult<Option<Doctor>> {
        let mut db = self.inner.write().await;
        Ok(db.doctor_mut(doctor_id).map(|doctor| {
            patch.apply(doctor);
            doctor.clone()
        }))
    }

    async fn toggle_availability(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        let mut db = self.inner.write().await;
        Ok(db.doctor_mut(doctor_id).map(|doctor| {
            doctor.available = !doctor.available;
            doctor.clone()
        }))
    }

    async fn delete_doctor(&self, doctor_id: &str) -> StoreResult<Option<u64>> {
        let mut db = self.inner.write().await;
        if !db.doctors.iter().any(|d| d.id == doctor_id) {
            return Ok(None);
        }

        let before = db.appointments.len();
        db.appointments.retain(|a| a.doctor_id != doctor_id);
        let removed = (before - db.appointments.len()) as u64;
        db.doctors.retain(|d| d.id != doctor_id);

        debug!("Deleted doctor {} and {} appointments", doctor_id, removed);
        Ok(Some(removed))
    }

    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut db = self.inner.write().await;
        if db.email_taken(&user.email) {
            return Err(StoreError::Duplicate(format!("Email {} is already registered", user.email)));
        }
        db.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut db = self.inner.write().await;
        Ok(db.users.iter_mut().find(|u| u.id == user_id).map(|user| {
            patch.apply(user);
            user.clone()
        }))
    }

    async fn delete_user(&self, user_id: &str) -> StoreResult<Option<u64>> {
        let mut db = self.inner.write().await;
        if !db.users.iter().any(|u| u.id == user_id) {
            return Ok(None);
        }

        let held: Vec<(String, String, String)> = db
            .appointments
            .iter()
            .filter(|a| a.user_id == user_id && a.holds_slot())
            .map(|a| (a.doctor_id.clone(), a.slot_date.clone(), a.slot_time.clone()))
            .collect();
        for (doctor_id, slot_date, slot_time) in held {
            if let Some(doctor) = db.doctor_mut(&doctor_id) {
                doctor.release_slot(&slot_date, &slot_time);
            }
        }

        let before = db.appointments.len();
        db.appointments.retain(|a| a.user_id != user_id);
        let removed = (before - db.appointments.len()) as u64;
        db.users.retain(|u| u.id != user_id);

        debug!("Deleted user {} and {} appointments", user_id, removed);
        Ok(Some(removed))
    }

    async fn find_appointment(&self, appointment_id: &str) -> StoreResult<Option<Appointment>> {
        let db = self.inner.read().await;
        Ok(db.appointments.iter().find(|a| a.id == appointment_id).cloned())
    }

    async fn list_appointments(&self, filter: &AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let db = self.inner.read().await;
        Ok(db.appointments.iter().filter(|a| filter.matches(a)).cloned().collect())
    }

    async fn book_slot(&self, appointment: Appointment) -> StoreResult<Appointment> {
        let mut db = self.inner.write().await;
        let doctor = db
            .doctor_mut(&appointment.doctor_id)
            .ok_or(StoreError::NotFound("Doctor"))?;

        if !doctor.book_slot(&appointment.slot_date, &appointment.slot_time) {
            return Err(StoreError::SlotTaken);
        }
        db.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn cancel_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        let mut db = self.inner.write().await;
        let idx = db
            .appointment_index(appointment_id)
            .ok_or(StoreError::NotFound("Appointment"))?;

        let appointment = &db.appointments[idx];
        if appointment.cancelled {
            return Err(StoreError::Closed("cancelled"));
        }
        if appointment.is_completed {
            return Err(StoreError::Closed("completed"));
        }

        let (doctor_id, slot_date, slot_time) = (
            appointment.doctor_id.clone(),
            appointment.slot_date.clone(),
            appointment.slot_time.clone(),
        );
        if let Some(doctor) = db.doctor_mut(&doctor_id) {
            doctor.release_slot(&slot_date, &slot_time);
        }

        let appointment = &mut db.appointments[idx];
        appointment.cancelled = true;
        Ok(appointment.clone())
    }

    async fn complete_appointment(&self, appointment_id: &str) -> StoreResult<Appointment> {
        let mut db = self.inner.write().await;
        let idx = db
            .appointment_index(appointment_id)
            .ok_or(StoreError::NotFound("Appointment"))?;

        let appointment = &mut db.appointments[idx];
        if appointment.cancelled {
            return Err(StoreError::Closed("cancelled"));
        }
        if appointment.is_completed {
            return Err(StoreError::Closed("completed"));
        }
        appointment.is_completed = true;
        Ok(appointment.clone())
    }

    async fn set_payment_order(&self, appointment_id: &str, order_id: &str) -> StoreResult<Appointment> {
        let mut db = self.inner.write().await;
        let idx = db
            .appointment_index(appointment_id)
            .ok_or(StoreError::NotFound("Appointment"))?;

        let appointment = &mut db.appointments[idx];
        appointment.payment_order_id = Some(order_id.to_string());
        Ok(appointment.clone())
    }

    async fn mark_paid(&self, appointment_id: &str) -> StoreResult<Appointment> {
        let mut db = self.inner.write().await;
        let idx = db
            .appointment_index(appointment_id)
            .ok_or(StoreError::NotFound("Appointment"))?;

        let appointment = &mut db.appointments[idx];
        if appointment.cancelled {
            return Err(StoreError::Closed("cancelled"));
        }
        appointment.payment = true;
        Ok(appointment.clone())
    }
}
