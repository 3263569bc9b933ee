//! # Razorpay Orders
//!
//! Gateway adapter for the Razorpay Orders API. One outbound call per
//! invocation; each call creates a new remote order. Failures surface to
//! the caller; retrying is a client-visible decision, never automatic.

use crate::config::RazorpayConfig;
use crate::signature;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument};
use typedesk_core::{
    Currency, OrderError, OrderResult, PaymentConfirmation, PaymentGateway, RemoteOrder,
    RemoteOrderRequest,
};

/// Razorpay gateway adapter
///
/// Holds the server-side credential pair; the secret never crosses the
/// `PaymentGateway` trait.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new gateway adapter. The HTTP client carries an explicit
    /// timeout so gateway calls fail rather than hang.
    pub fn new(config: RazorpayConfig) -> OrderResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| OrderError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> OrderResult<Self> {
        Self::new(RazorpayConfig::from_env()?)
    }

    pub fn config(&self) -> &RazorpayConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, request), fields(amount = request.amount_minor))]
    async fn create_remote_order(&self, request: &RemoteOrderRequest) -> OrderResult<RemoteOrder> {
        // Amount is validated before any network call
        request.validate()?;

        let receipt = request
            .receipt
            .clone()
            .unwrap_or_else(|| format!("receipt_{}", chrono::Utc::now().timestamp_millis()));

        let body = RazorpayOrderBody {
            amount: request.amount_minor,
            currency: request.currency.as_str(),
            receipt: &receipt,
            notes: &request.notes,
            // Auto capture payment
            payment_capture: 1,
        };

        debug!("Creating Razorpay order: receipt={}", receipt);

        let url = format!("{}/v1/orders", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, text);

            // Relay the upstream description, never the secret
            if let Ok(err_response) = serde_json::from_str::<RazorpayErrorResponse>(&text) {
                return Err(OrderError::Gateway {
                    provider: "razorpay".to_string(),
                    message: err_response.error.description,
                });
            }

            return Err(OrderError::Gateway {
                provider: "razorpay".to_string(),
                message: format!("HTTP {}: {}", status, text),
            });
        }

        let order: RazorpayOrderResponse = serde_json::from_str(&text).map_err(|e| {
            OrderError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })?;

        info!(
            "Created Razorpay order: id={}, amount={}, currency={}",
            order.id, order.amount, order.currency
        );

        let currency = match order.currency.as_str() {
            "USD" => Currency::USD,
            _ => Currency::INR,
        };

        Ok(RemoteOrder {
            id: order.id,
            amount_minor: order.amount,
            currency,
            receipt: order.receipt,
        })
    }

    fn verify_payment(&self, confirmation: &PaymentConfirmation) -> OrderResult<bool> {
        signature::verify_payment_signature(
            &confirmation.remote_order_id,
            &confirmation.payment_id,
            &confirmation.signature,
            &self.config.key_secret,
        )
    }

    fn public_key(&self) -> &str {
        &self.config.key_id
    }

    fn provider_name(&self) -> &'static str {
        "razorpay"
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct RazorpayOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: &'a HashMap<String, String>,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct RazorpayOrderResponse {
    id: String,
    amount: i64,
    currency: String,
    #[serde(default)]
    receipt: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    #[serde(default)]
    code: Option<String>,
    description: String,
}
