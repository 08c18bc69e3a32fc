use serde::Serialize;

use shared_models::Appointment;

/// `latest_appointments` holds every appointment, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}
