//! # Order Error Types
//!
//! Typed error handling for the typedesk order pipeline.
//! All order and payment operations return `Result<T, OrderError>`.

use thiserror::Error;

/// Core error type for all order and payment operations
#[derive(Debug, Error)]
pub enum OrderError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Service type not present in the rate table
    #[error("Unknown service: {service}")]
    UnknownService { service: String },

    /// Non-positive or missing amount
    #[error("Invalid amount: {amount} (must be a positive integer in minor units)")]
    InvalidAmount { amount: i64 },

    /// A required field was missing or empty
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Payment gateway API error
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Payment signature verification failed.
    /// Security-relevant rejection, not a transient fault.
    #[error("Payment verification failed: {0}")]
    VerificationFailed(String),

    /// Webhook signature rejected or payload unparseable
    #[error("Webhook rejected: {0}")]
    WebhookRejected(String),

    /// Order persistence failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Checkout attempted from the wrong state
    #[error("Invalid checkout state: {0}")]
    InvalidState(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrderError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            OrderError::Configuration(_) => 500,
            OrderError::Validation(_) => 400,
            OrderError::UnknownService { .. } => 400,
            OrderError::InvalidAmount { .. } => 400,
            OrderError::MissingField { .. } => 400,
            OrderError::Gateway { .. } => 502,
            OrderError::Network(_) => 503,
            OrderError::VerificationFailed(_) => 400,
            OrderError::WebhookRejected(_) => 401,
            OrderError::Persistence(_) => 500,
            OrderError::InvalidState(_) => 409,
            OrderError::Serialization(_) => 500,
        }
    }

    /// Returns true for client-caused errors (400-equivalent)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Result type alias for order operations
pub type OrderResult<T> = Result<T, OrderError>;
