use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::AppError;

/// Order as the gateway reports it. `amount` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

impl PaymentOrder {
    pub fn is_paid(&self) -> bool {
        self.status == "paid"
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Online payments are not configured")]
    NotConfigured,

    #[error("Payment gateway error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Payment gateway unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected payment gateway response: {0}")]
    Decode(String),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::ExternalService(err.to_string())
    }
}

/// External payment provider. Only order creation and order lookup are
/// needed: a paid order's receipt names the appointment it settles.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, PaymentError>;
}
