use std::sync::Arc;

use tracing::{info, warn};

use shared_database::ClinicStore;
use shared_models::{UserPatch, UserProfile};
use shared_utils::validation::{any_blank, check_delete_confirmation};
use shared_utils::AppState;

use crate::models::{PatientError, UpdateProfileRequest};

/// A patient's own account: read, edit and close it.
pub struct ProfileService {
    store: Arc<dyn ClinicStore>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, PatientError> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(PatientError::NotFound)?;
        Ok(user.to_profile())
    }

    /// Name, phone, date of birth and gender are required; the address is
    /// replaced only when one is sent.
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, PatientError> {
        if any_blank(&[&request.name, &request.phone, &request.dob, &request.gender]) {
            return Err(PatientError::Validation("Data Missing".to_string()));
        }

        let patch = UserPatch {
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            address: request.address,
            gender: request.gender,
            dob: request.dob,
        };

        let user = self
            .store
            .update_user(user_id, patch)
            .await?
            .ok_or(PatientError::NotFound)?;

        info!("Updated profile for user {}", user_id);
        Ok(user.to_profile())
    }

    /// Deletes the account and its appointments. Slots held by open
    /// appointments go back to their doctors.
    pub async fn delete_profile(&self, user_id: &str, confirmation: &str) -> Result<u64, PatientError> {
        check_delete_confirmation(confirmation)
            .map_err(|e| PatientError::Validation(e.public_message()))?;

        match self.store.delete_user(user_id).await? {
            Some(removed) => {
                info!("Deleted user {} with {} appointments", user_id, removed);
                Ok(removed)
            }
            None => {
                warn!("Delete requested for unknown user {}", user_id);
                Err(PatientError::NotFound)
            }
        }
    }
}
