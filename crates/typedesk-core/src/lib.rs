//! # typedesk-core
//!
//! Core types for the typedesk order and payment pipeline.
//!
//! This crate provides:
//! - `quote` and `PriceQuote`: the pure pricing engine
//! - `OrderDraft` and `FinalizedOrder`: the order lifecycle
//! - `PaymentGateway`, `HostedCheckout`, `OrderStore`: the seams the
//!   orchestrator runs against
//! - `Checkout`: the state machine sequencing submission, remote-order
//!   creation, the hosted widget, signature verification and persistence
//! - `OrderError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use typedesk_core::{Checkout, Currency, OrderDraft, PricingConfig, ServiceKind, Urgency};
//!
//! let draft = OrderDraft::new(ServiceKind::Document, 10, "Asha", "asha@example.com", "9876543210")
//!     .with_urgency(Urgency::Standard)
//!     .accept_terms();
//!
//! let mut checkout = Checkout::new(draft);
//! checkout.submit(&PricingConfig::default())?;
//!
//! match checkout.pay_now(&gateway, &widget, &store, Currency::INR).await? {
//!     PayNowOutcome::Finalized(order) => println!("paid: {:?}", order.payment),
//!     PayNowOutcome::Cancelled => println!("user backed out"),
//! }
//! ```

pub mod checkout;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod money;
pub mod pricing;
pub mod service;

// Re-exports for convenience
pub use checkout::{Checkout, CheckoutState, PayNowOutcome};
pub use draft::{
    generate_order_id, FileType, FinalizedOrder, OrderDraft, OrderStatus, PaymentRecord,
};
pub use error::{OrderError, OrderResult};
pub use gateway::{
    HostedCheckout, MemoryOrderStore, OrderStore, PaymentConfirmation, PaymentGateway,
    RemoteOrder, RemoteOrderRequest, SharedGateway, SharedOrderStore, WidgetOutcome,
};
pub use money::{round2, Currency};
pub use pricing::{quote, PriceQuote};
pub use service::{PricingConfig, ServiceKind, ServiceRate, ServiceUnit, Urgency};
