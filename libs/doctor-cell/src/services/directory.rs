use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::{ClinicStore, StoreError};
use shared_models::{
    AppointmentFilter, Doctor, DoctorListing, DoctorPatch, DoctorProfile,
};
use shared_utils::password::hash_password;
use shared_utils::validation::{any_blank, check_delete_confirmation, validate_credentials};
use shared_utils::AppState;

use crate::models::{AddDoctorRequest, DoctorDashboard, DoctorError, UpdateDoctorRequest};
use crate::services::slots::{self, SlotCandidate};

pub struct DirectoryService {
    store: Arc<dyn ClinicStore>,
}

impl DirectoryService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    async fn doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        self.store
            .find_doctor(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn list_doctors(&self) -> Result<Vec<DoctorListing>, DoctorError> {
        let doctors = self.store.list_doctors().await?;
        debug!("Listing {} doctors", doctors.len());
        Ok(doctors.iter().map(Doctor::to_listing).collect())
    }

    /// Admin view: everything except the password hash.
    pub async fn all_doctors(&self) -> Result<Vec<DoctorProfile>, DoctorError> {
        let doctors = self.store.list_doctors().await?;
        Ok(doctors.iter().map(Doctor::to_profile).collect())
    }

    pub async fn doctor_profile(&self, doctor_id: &str) -> Result<DoctorProfile, DoctorError> {
        Ok(self.doctor(doctor_id).await?.to_profile())
    }

    pub async fn add_doctor(&self, request: AddDoctorRequest) -> Result<DoctorProfile, DoctorError> {
        if any_blank(&[&request.name, &request.email, &request.password, &request.speciality]) {
            return Err(DoctorError::Validation("Missing Details".to_string()));
        }
        validate_credentials(&request.email, &request.password)
            .map_err(|e| DoctorError::Validation(e.public_message()))?;
        if !(request.fee.is_finite() && request.fee > 0.0) {
            return Err(DoctorError::Validation("Fee must be a positive amount".to_string()));
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| DoctorError::Internal(e.to_string()))?;

        let doctor = Doctor {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            password_hash,
            image: request.image,
            speciality: request.speciality,
            degree: request.degree,
            experience: request.experience,
            about: request.about,
            available: true,
            fee: request.fee,
            address: request.address,
            booked_slots: Default::default(),
            created_at: Utc::now(),
        };

        let doctor = self.store.insert_doctor(doctor).await.map_err(|e| match e {
            StoreError::Duplicate(_) => DoctorError::EmailTaken,
            other => DoctorError::Store(other),
        })?;

        info!("Added doctor {} ({})", doctor.id, doctor.speciality);
        Ok(doctor.to_profile())
    }

    pub async fn update_profile(
        &self,
        doctor_id: &str,
        request: UpdateDoctorRequest,
    ) -> Result<DoctorProfile, DoctorError> {
        if let Some(fee) = request.fee {
            if !(fee.is_finite() && fee > 0.0) {
                return Err(DoctorError::Validation("Fee must be a positive amount".to_string()));
            }
        }

        let patch = DoctorPatch {
            fee: request.fee,
            address: request.address,
            available: request.available,
            about: request.about,
        };
        if patch.is_empty() {
            return self.doctor_profile(doctor_id).await;
        }

        let doctor = self
            .store
            .update_doctor(doctor_id, patch)
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Updated profile of doctor {}", doctor_id);
        Ok(doctor.to_profile())
    }

    pub async fn toggle_availability(&self, doctor_id: &str) -> Result<bool, DoctorError> {
        let doctor = self
            .store
            .toggle_availability(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;

        info!("Doctor {} availability is now {}", doctor_id, doctor.available);
        Ok(doctor.available)
    }

    /// Removes the doctor together with every appointment that references them.
    pub async fn delete_doctor(&self, doctor_id: &str) -> Result<u64, DoctorError> {
        match self.store.delete_doctor(doctor_id).await? {
            Some(removed) => {
                info!("Deleted doctor {} with {} appointments", doctor_id, removed);
                Ok(removed)
            }
            None => {
                warn!("Delete requested for unknown doctor {}", doctor_id);
                Err(DoctorError::NotFound)
            }
        }
    }

    /// A doctor closing their own account confirms it the way patients do.
    pub async fn delete_own_profile(
        &self,
        doctor_id: &str,
        confirmation: &str,
    ) -> Result<u64, DoctorError> {
        check_delete_confirmation(confirmation)
            .map_err(|e| DoctorError::Validation(e.public_message()))?;
        self.delete_doctor(doctor_id).await
    }

    pub async fn dashboard(&self, doctor_id: &str) -> Result<DoctorDashboard, DoctorError> {
        self.doctor(doctor_id).await?;
        let appointments = self
            .store
            .list_appointments(&AppointmentFilter::for_doctor(doctor_id))
            .await?;

        let earnings = appointments
            .iter()
            .filter(|a| !a.cancelled && (a.is_completed || a.payment))
            .map(|a| a.fee)
            .sum();
        let patients = appointments
            .iter()
            .map(|a| a.user_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(DoctorDashboard {
            earnings,
            appointments: appointments.len(),
            patients,
            latest_appointments: appointments.into_iter().rev().collect(),
        })
    }

    pub async fn available_slots(
        &self,
        doctor_id: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<Vec<SlotCandidate>>, DoctorError> {
        let doctor = self.doctor(doctor_id).await?;
        Ok(slots::available_slots(&doctor.booked_slots, now))
    }
}
