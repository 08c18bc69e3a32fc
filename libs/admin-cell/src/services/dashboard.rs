use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use shared_database::ClinicStore;
use shared_models::{AppError, AppointmentFilter};
use shared_utils::AppState;

use crate::models::AdminDashboard;

/// Clinic-wide counts for the admin panel.
pub struct DashboardService {
    store: Arc<dyn ClinicStore>,
}

impl DashboardService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// Patients are the distinct users that hold at least one appointment.
    pub async fn summary(&self) -> Result<AdminDashboard, AppError> {
        let doctors = self.store.list_doctors().await?;
        let appointments = self
            .store
            .list_appointments(&AppointmentFilter::default())
            .await?;

        let patients = appointments
            .iter()
            .map(|a| a.user_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        debug!(
            "Dashboard: {} doctors, {} appointments, {} patients",
            doctors.len(),
            appointments.len(),
            patients
        );

        Ok(AdminDashboard {
            doctors: doctors.len(),
            appointments: appointments.len(),
            patients,
            latest_appointments: appointments.into_iter().rev().collect(),
        })
    }
}
