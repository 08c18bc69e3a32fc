use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::{store_from_config, ClinicStore};
use shared_payments::{PaymentGateway, RazorpayClient};

/// Everything a handler needs: configuration plus the storage and payment seams.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ClinicStore>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ClinicStore>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            config,
            store,
            payments,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let store = store_from_config(&config);
        let payments: Arc<dyn PaymentGateway> = Arc::new(RazorpayClient::new(&config));
        Self::new(config, store, payments)
    }
}
