use std::sync::Arc;

use tracing::{info, warn};

use shared_database::ClinicStore;
use shared_models::Appointment;
use shared_payments::{PaymentGateway, PaymentOrder};
use shared_utils::AppState;

use crate::models::PatientError;

/// Online payment for a booked appointment. The gateway order carries the
/// appointment id as its receipt, so verification needs only the order id.
pub struct PaymentService {
    store: Arc<dyn ClinicStore>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl PaymentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            gateway: state.payments.clone(),
            currency: state.config.currency.clone(),
        }
    }

    async fn owned_appointment(
        &self,
        appointment_id: &str,
        user_id: &str,
    ) -> Result<Appointment, PatientError> {
        let appointment = self
            .store
            .find_appointment(appointment_id)
            .await?
            .ok_or(PatientError::AppointmentNotFound)?;

        if appointment.user_id != user_id {
            warn!("User {} tried to pay for appointment {}", user_id, appointment_id);
            return Err(PatientError::NotOwner);
        }
        Ok(appointment)
    }

    pub async fn create_order(
        &self,
        user_id: &str,
        appointment_id: &str,
    ) -> Result<PaymentOrder, PatientError> {
        let appointment = self.owned_appointment(appointment_id, user_id).await?;

        if appointment.cancelled {
            return Err(PatientError::Validation(
                "Appointment Cancelled or not found".to_string(),
            ));
        }
        if appointment.payment {
            return Err(PatientError::Validation("Appointment already paid".to_string()));
        }

        let amount = minor_units(appointment.fee);
        let order = self
            .gateway
            .create_order(amount, &self.currency, &appointment.id)
            .await?;

        self.store.set_payment_order(&appointment.id, &order.id).await?;
        info!("Created payment order {} for appointment {}", order.id, appointment.id);
        Ok(order)
    }

    /// Marks the appointment paid once the gateway reports the order as paid.
    pub async fn verify_payment(
        &self,
        user_id: &str,
        order_id: &str,
    ) -> Result<Appointment, PatientError> {
        let order = self.gateway.fetch_order(order_id).await?;
        if !order.is_paid() {
            warn!("Order {} is {}", order_id, order.status);
            return Err(PatientError::PaymentFailed);
        }

        let appointment_id = order.receipt.as_deref().ok_or(PatientError::AppointmentNotFound)?;
        let appointment = self.owned_appointment(appointment_id, user_id).await?;
        if appointment.payment {
            return Ok(appointment);
        }

        let appointment = self.store.mark_paid(&appointment.id).await?;
        info!("Appointment {} paid with order {}", appointment.id, order_id);
        Ok(appointment)
    }
}

/// Gateway amounts are integers in the currency's smallest unit.
fn minor_units(fee: f64) -> u64 {
    (fee * 100.0).round().max(0.0) as u64
}
