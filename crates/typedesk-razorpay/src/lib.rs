//! # typedesk-razorpay
//!
//! Razorpay gateway adapter for typedesk-rs.
//!
//! This crate provides:
//!
//! 1. **RazorpayGateway**: `PaymentGateway` implementation over the
//!    Razorpay Orders API (basic-auth REST, explicit timeout)
//! 2. **signature**: the two HMAC-SHA256 verification schemes
//!    (payment: `order_id|payment_id`; webhook: raw body)
//! 3. **webhook**: callback parsing and handler dispatch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typedesk_razorpay::RazorpayGateway;
//! use typedesk_core::{Currency, PaymentGateway, RemoteOrderRequest};
//!
//! let gateway = RazorpayGateway::from_env()?;
//!
//! let order = gateway
//!     .create_remote_order(&RemoteOrderRequest::new(2360, Currency::INR))
//!     .await?;
//!
//! // Hand order.id and gateway.public_key() to the hosted widget;
//! // verify the returned confirmation with gateway.verify_payment(...).
//! ```

pub mod config;
pub mod orders;
pub mod signature;
pub mod webhook;

// Re-exports
pub use config::RazorpayConfig;
pub use orders::RazorpayGateway;
pub use signature::{payment_signature, verify_payment_signature, verify_webhook_signature};
pub use webhook::{
    dispatch_webhook_event, parse_webhook_event, LoggingWebhookHandler, WebhookEvent,
    WebhookHandler, WebhookKind,
};
