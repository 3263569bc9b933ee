//! # Gateway Seam
//!
//! Traits at the boundaries of the checkout pipeline: the payment gateway,
//! the hosted checkout widget, and order persistence. Providers implement
//! `PaymentGateway`; the orchestrator only sees these traits, so tests run
//! against doubles with fixed keys and canned outcomes.

use crate::draft::{FinalizedOrder, OrderDraft};
use crate::error::{OrderError, OrderResult};
use crate::money::Currency;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Request to create a gateway-side order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrderRequest {
    /// Amount in minor currency units; must be positive
    pub amount_minor: i64,
    pub currency: Currency,
    /// Receipt identifier relayed to the gateway
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    /// Free-form notes attached to the gateway order
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub notes: HashMap<String, String>,
}

impl RemoteOrderRequest {
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
            receipt: None,
            notes: HashMap::new(),
        }
    }

    /// Builder: set the receipt identifier
    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }

    /// Builder: attach a note
    pub fn with_note(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.notes.insert(key.into(), value.into());
        self
    }

    /// Reject non-positive amounts before any network call
    pub fn validate(&self) -> OrderResult<()> {
        if self.amount_minor <= 0 {
            return Err(OrderError::InvalidAmount {
                amount: self.amount_minor,
            });
        }
        Ok(())
    }
}

/// An order created and owned by the payment gateway; relayed verbatim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    /// Opaque gateway-issued id
    pub id: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    pub currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

/// Proof of completion reported by the hosted widget, correlated back to
/// exactly one draft via the remote order id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub remote_order_id: String,
    pub payment_id: String,
    /// Lowercase hex HMAC issued by the gateway
    pub signature: String,
}

/// A payment gateway capable of creating remote orders and verifying the
/// signatures it issues.
///
/// Each `create_remote_order` call creates a new gateway order; callers must
/// not invoke it twice for one draft without discarding the first order, and
/// must never retry automatically.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a remote order. Implementations must reject invalid amounts
    /// via [`RemoteOrderRequest::validate`] before any network call.
    async fn create_remote_order(&self, request: &RemoteOrderRequest) -> OrderResult<RemoteOrder>;

    /// Verify a payment confirmation against the gateway's shared secret.
    /// Returns `Ok(true)` only on an exact signature match.
    fn verify_payment(&self, confirmation: &PaymentConfirmation) -> OrderResult<bool>;

    /// Public key identifier, safe to hand to clients. The secret never
    /// crosses this trait.
    fn public_key(&self) -> &str;

    /// Provider name for logging and routing
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn PaymentGateway>;

/// Outcome of the hosted checkout widget interaction
#[derive(Debug, Clone)]
pub enum WidgetOutcome {
    /// User completed payment in the widget
    Completed(PaymentConfirmation),
    /// User dismissed the widget without paying
    Dismissed,
}

/// The hosted payment widget, an opaque external interaction. The
/// orchestrator awaits it as a single sequential step; dismissal is an
/// explicit outcome, not an ignored callback.
#[async_trait]
pub trait HostedCheckout: Send + Sync {
    async fn collect_payment(
        &self,
        order: &RemoteOrder,
        draft: &OrderDraft,
    ) -> OrderResult<WidgetOutcome>;
}

/// Order persistence. A stand-in for durable storage: the pipeline only
/// needs `persist(FinalizedOrder) -> ack`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn persist(&self, order: &FinalizedOrder) -> OrderResult<()>;

    /// All persisted orders, newest last (admin listing)
    async fn list(&self) -> OrderResult<Vec<FinalizedOrder>>;
}

/// Type alias for a shared order store
pub type SharedOrderStore = Arc<dyn OrderStore>;

/// In-memory order store
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<FinalizedOrder>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn persist(&self, order: &FinalizedOrder) -> OrderResult<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderError::Persistence("order store lock poisoned".to_string()))?;
        orders.push(order.clone());
        Ok(())
    }

    async fn list(&self) -> OrderResult<Vec<FinalizedOrder>> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderError::Persistence("order store lock poisoned".to_string()))?;
        Ok(orders.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceKind;

    #[test]
    fn test_amount_validation() {
        assert!(matches!(
            RemoteOrderRequest::new(0, Currency::INR).validate(),
            Err(OrderError::InvalidAmount { amount: 0 })
        ));
        assert!(matches!(
            RemoteOrderRequest::new(-5, Currency::INR).validate(),
            Err(OrderError::InvalidAmount { amount: -5 })
        ));
        assert!(RemoteOrderRequest::new(2360, Currency::INR)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_request_builder() {
        let req = RemoteOrderRequest::new(2360, Currency::INR)
            .with_receipt("receipt_TS-00000001")
            .with_note("order_id", "TS-00000001");

        assert_eq!(req.receipt.as_deref(), Some("receipt_TS-00000001"));
        assert_eq!(req.notes.get("order_id").map(String::as_str), Some("TS-00000001"));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryOrderStore::new();
        let order = FinalizedOrder {
            draft: OrderDraft::new(
                ServiceKind::Document,
                3,
                "Ravi",
                "ravi@example.com",
                "9876543210",
            ),
            payment: None,
        };

        store.persist(&order).await.unwrap();
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].draft.name, "Ravi");
    }
}
