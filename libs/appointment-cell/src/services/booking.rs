use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::services::slots::is_offered;
use shared_database::ClinicStore;
use shared_models::{Appointment, AppointmentFilter, Role, Session};
use shared_utils::AppState;

use crate::models::{AppointmentError, AppointmentStatus, BookAppointmentRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Books a slot for the patient. The grid and free-slot checks run against
    /// `now`; the store re-checks the slot atomically with the insert, so of
    /// two racing requests for one slot exactly one is admitted.
    pub async fn book_appointment(
        &self,
        user_id: &str,
        request: BookAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking {} {} with doctor {} for user {}",
            request.slot_date, request.slot_time, request.doctor_id, user_id
        );

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;
        let doctor = self
            .store
            .find_doctor(&request.doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        if !doctor.available {
            return Err(AppointmentError::DoctorNotAvailable);
        }

        if !is_offered(now, &request.slot_date, &request.slot_time) {
            warn!(
                "Rejected off-grid slot {} {} for doctor {}",
                request.slot_date, request.slot_time, doctor.id
            );
            return Err(AppointmentError::SlotNotOffered {
                slot_date: request.slot_date,
                slot_time: request.slot_time,
            });
        }

        if doctor.is_slot_booked(&request.slot_date, &request.slot_time) {
            return Err(AppointmentError::SlotNotAvailable);
        }

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            doctor_id: doctor.id.clone(),
            user_id: user.id.clone(),
            slot_date: request.slot_date,
            slot_time: request.slot_time,
            fee: doctor.fee,
            cancelled: false,
            is_completed: false,
            payment: false,
            payment_order_id: None,
            doctor_name: doctor.name,
            doctor_speciality: doctor.speciality,
            doctor_image: doctor.image,
            patient_name: user.name,
            patient_email: user.email,
            created_at: Utc::now(),
        };

        let appointment = self.store.book_slot(appointment).await?;
        info!(
            "Booked appointment {} ({} {}) with doctor {}",
            appointment.id, appointment.slot_date, appointment.slot_time, appointment.doctor_id
        );
        Ok(appointment)
    }

    async fn appointment(&self, appointment_id: &str) -> Result<Appointment, AppointmentError> {
        self.store
            .find_appointment(appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Doctors and patients may cancel only their own appointments; admins any.
    /// Cancelling frees the slot for rebooking.
    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        session: &Session,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.appointment(appointment_id).await?;

        let owns = match session.role {
            Role::Doctor => appointment.doctor_id == session.principal_id,
            Role::Patient => appointment.user_id == session.principal_id,
            Role::Admin => true,
        };
        if !owns {
            warn!(
                "{} {} tried to cancel appointment {} they do not own",
                session.role, session.principal_id, appointment_id
            );
            return Err(AppointmentError::Unauthorized);
        }

        self.lifecycle_service
            .validate_status_transition(AppointmentStatus::of(&appointment), AppointmentStatus::Cancelled)?;

        let cancelled = self.store.cancel_appointment(appointment_id).await?;
        info!("Appointment {} cancelled by {}", appointment_id, session.role);
        Ok(cancelled)
    }

    pub async fn complete_appointment(
        &self,
        appointment_id: &str,
        doctor_id: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.appointment(appointment_id).await?;

        if appointment.doctor_id != doctor_id {
            warn!("Doctor {} tried to complete appointment {}", doctor_id, appointment_id);
            return Err(AppointmentError::Unauthorized);
        }

        self.lifecycle_service
            .validate_status_transition(AppointmentStatus::of(&appointment), AppointmentStatus::Completed)?;

        let completed = self.store.complete_appointment(appointment_id).await?;
        info!("Appointment {} completed", appointment_id);
        Ok(completed)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self
            .store
            .list_appointments(&AppointmentFilter::for_user(user_id))
            .await?)
    }

    pub async fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self
            .store
            .list_appointments(&AppointmentFilter::for_doctor(doctor_id))
            .await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self
            .store
            .list_appointments(&AppointmentFilter::default())
            .await?)
    }
}
