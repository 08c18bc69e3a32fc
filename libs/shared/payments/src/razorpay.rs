use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::gateway::{PaymentError, PaymentGateway, PaymentOrder};

/// Razorpay Orders API client.
/// POST /orders to create, GET /orders/{id} to check status.
pub struct RazorpayClient {
    client: Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

impl RazorpayClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
            base_url: config.razorpay_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn ensure_configured(&self) -> Result<(), PaymentError> {
        if self.key_id.is_empty() || self.key_secret.is_empty() {
            return Err(PaymentError::NotConfigured);
        }
        Ok(())
    }

    async fn read_order(response: reqwest::Response) -> Result<PaymentOrder, PaymentError> {
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Razorpay request failed: {} - {}", status, response_text);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        serde_json::from_str(&response_text)
            .map_err(|e| PaymentError::Decode(format!("Failed to parse order: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        self.ensure_configured()?;

        let url = format!("{}/orders", self.base_url);
        debug!("Creating Razorpay order for receipt {} at {}", receipt, url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateOrderRequest { amount, currency, receipt })
            .send()
            .await?;

        let order = Self::read_order(response).await?;
        info!("Created Razorpay order {} for receipt {}", order.id, receipt);
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, PaymentError> {
        self.ensure_configured()?;

        let url = format!("{}/orders/{}", self.base_url, order_id);
        debug!("Fetching Razorpay order {}", order_id);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        Self::read_order(response).await
    }
}
