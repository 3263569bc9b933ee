//! # Checkout Orchestrator
//!
//! Drives an order draft through submission and payment:
//!
//! ```text
//! DRAFTING -> SUBMITTED -> (pay-now) AWAITING_REMOTE_ORDER
//!           -> AWAITING_GATEWAY_COMPLETION -> AWAITING_VERIFICATION
//!           -> FINALIZED | VERIFICATION_FAILED
//!           -> (pay-later) FINALIZED(unpaid)
//! ```
//!
//! Every server-side step (create remote order, verify signature, persist)
//! is a short independent unit of work awaited in sequence; each must
//! complete or fail before the next begins. An order is never considered
//! paid without a successful server-side signature verification; the
//! widget's client-reported success alone is never sufficient.

use crate::draft::{generate_order_id, FinalizedOrder, OrderDraft, OrderStatus, PaymentRecord};
use crate::error::{OrderError, OrderResult};
use crate::gateway::{
    HostedCheckout, OrderStore, PaymentGateway, RemoteOrderRequest, WidgetOutcome,
};
use crate::money::Currency;
use crate::pricing::quote;
use crate::service::PricingConfig;
use chrono::Utc;
use tracing::{info, warn};

/// Checkout flow state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Draft being edited across form steps
    Drafting,
    /// Terms accepted, price stamped, order id assigned.
    /// Terminal for the pay-later path.
    Submitted,
    /// Creating the gateway-side order
    AwaitingRemoteOrder,
    /// Hosted widget open; opaque external interaction
    AwaitingGatewayCompletion,
    /// Confirming the payment signature server-side
    AwaitingVerification,
    /// Order persisted (paid or explicitly unpaid)
    Finalized,
    /// Payment could not be completed or proven; the draft keeps its last
    /// good state and is never marked paid
    VerificationFailed { reason: String },
}

/// Result of a pay-now run that did not error
#[derive(Debug)]
pub enum PayNowOutcome {
    /// Payment verified and order persisted
    Finalized(FinalizedOrder),
    /// User dismissed the widget (or it errored out); checkout returned to
    /// `Submitted` with no partial state
    Cancelled,
}

/// Orchestrates one draft's path from submission to a finalized order.
/// Single logical flow per user session; no concurrent mutation of a draft.
#[derive(Debug)]
pub struct Checkout {
    draft: OrderDraft,
    state: CheckoutState,
}

impl Checkout {
    pub fn new(draft: OrderDraft) -> Self {
        Self {
            draft,
            state: CheckoutState::Drafting,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    /// Mutable access while still drafting (form steps editing fields)
    pub fn draft_mut(&mut self) -> OrderResult<&mut OrderDraft> {
        match self.state {
            CheckoutState::Drafting => Ok(&mut self.draft),
            _ => Err(OrderError::InvalidState(
                "draft can only be edited before submission".to_string(),
            )),
        }
    }

    /// Finalize the draft for checkout: validate, stamp the engine price,
    /// assign the order id. Terms must already be accepted.
    pub fn submit(&mut self, pricing: &PricingConfig) -> OrderResult<()> {
        if self.state != CheckoutState::Drafting {
            return Err(OrderError::InvalidState(format!(
                "cannot submit from {:?}",
                self.state
            )));
        }

        let now = Utc::now();
        self.draft.validate(now.date_naive())?;

        let quoted = quote(pricing, self.draft.service, self.draft.pages, self.draft.urgency)?;
        self.draft.price = Some(quoted.total);
        self.draft.order_id = Some(generate_order_id(now));
        self.state = CheckoutState::Submitted;

        info!(
            order_id = %self.draft.order_id.as_deref().unwrap_or_default(),
            service = %self.draft.service,
            total = quoted.total,
            "order submitted"
        );
        Ok(())
    }

    /// Run the pay-now path: create the remote order, open the hosted
    /// widget, verify the returned signature, persist.
    ///
    /// On gateway failure the error is surfaced and the draft keeps its
    /// submitted price and id; retrying is a user decision, never
    /// automatic. Widget dismissal or widget error returns the checkout to
    /// `Submitted`. A persistence failure after successful verification is
    /// tolerated: the order still finalizes and reconciliation happens
    /// out-of-band.
    pub async fn pay_now(
        &mut self,
        gateway: &dyn PaymentGateway,
        widget: &dyn HostedCheckout,
        store: &dyn OrderStore,
        currency: Currency,
    ) -> OrderResult<PayNowOutcome> {
        if self.state != CheckoutState::Submitted {
            return Err(OrderError::InvalidState(format!(
                "pay-now requires a submitted order, got {:?}",
                self.state
            )));
        }

        let price = self.draft.price.ok_or_else(|| {
            OrderError::InvalidState("submitted draft has no stamped price".to_string())
        })?;

        // Step 1: create the gateway-side order
        self.state = CheckoutState::AwaitingRemoteOrder;
        let request = RemoteOrderRequest::new(currency.to_minor_units(price), currency)
            .with_receipt(self.draft.receipt())
            .with_note(
                "order_id",
                self.draft.order_id.clone().unwrap_or_default(),
            );

        let remote_order = match gateway.create_remote_order(&request).await {
            Ok(order) => order,
            Err(err) => {
                self.state = CheckoutState::VerificationFailed {
                    reason: "could not create order".to_string(),
                };
                return Err(err);
            }
        };

        // Step 2: hosted widget; dismissal and widget errors both cancel
        self.state = CheckoutState::AwaitingGatewayCompletion;
        let confirmation = match widget.collect_payment(&remote_order, &self.draft).await {
            Ok(WidgetOutcome::Completed(confirmation)) => confirmation,
            Ok(WidgetOutcome::Dismissed) | Err(_) => {
                self.state = CheckoutState::Submitted;
                info!(
                    order_id = %self.draft.order_id.as_deref().unwrap_or_default(),
                    "payment cancelled at hosted checkout"
                );
                return Ok(PayNowOutcome::Cancelled);
            }
        };

        // Step 3: server-side signature verification
        self.state = CheckoutState::AwaitingVerification;
        match gateway.verify_payment(&confirmation) {
            Ok(true) => {}
            Ok(false) => {
                self.state = CheckoutState::VerificationFailed {
                    reason: "payment signature mismatch".to_string(),
                };
                return Err(OrderError::VerificationFailed(
                    "payment signature mismatch".to_string(),
                ));
            }
            Err(err) => {
                self.state = CheckoutState::VerificationFailed {
                    reason: err.to_string(),
                };
                return Err(err);
            }
        }

        // Step 4: finalize and persist
        let mut draft = self.draft.clone();
        draft.status = OrderStatus::Processing;
        let finalized = FinalizedOrder {
            draft,
            payment: Some(PaymentRecord {
                transaction_id: confirmation.payment_id.clone(),
                remote_order_id: confirmation.remote_order_id.clone(),
                amount: remote_order.amount_minor,
                status: "completed".to_string(),
                timestamp: Utc::now(),
            }),
        };

        if let Err(err) = store.persist(&finalized).await {
            warn!(
                order_id = %finalized.draft.order_id.as_deref().unwrap_or_default(),
                error = %err,
                "order paid but persistence failed; continuing to success"
            );
        }

        self.state = CheckoutState::Finalized;
        info!(
            order_id = %finalized.draft.order_id.as_deref().unwrap_or_default(),
            payment_id = %confirmation.payment_id,
            "order finalized"
        );
        Ok(PayNowOutcome::Finalized(finalized))
    }

    /// Pay-later path: persist the submitted order unpaid
    pub async fn pay_later(&mut self, store: &dyn OrderStore) -> OrderResult<FinalizedOrder> {
        if self.state != CheckoutState::Submitted {
            return Err(OrderError::InvalidState(format!(
                "pay-later requires a submitted order, got {:?}",
                self.state
            )));
        }

        let finalized = FinalizedOrder {
            draft: self.draft.clone(),
            payment: None,
        };
        store.persist(&finalized).await?;

        self.state = CheckoutState::Finalized;
        info!(
            order_id = %finalized.draft.order_id.as_deref().unwrap_or_default(),
            "order placed, payment deferred"
        );
        Ok(finalized)
    }

    /// Explicit user-driven return to `Submitted` after a failed attempt.
    /// The stamped price and order id are kept.
    pub fn reinitiate(&mut self) -> OrderResult<()> {
        match self.state {
            CheckoutState::VerificationFailed { .. } => {
                self.state = CheckoutState::Submitted;
                Ok(())
            }
            _ => Err(OrderError::InvalidState(
                "only a failed checkout can be reinitiated".to_string(),
            )),
        }
    }
}
