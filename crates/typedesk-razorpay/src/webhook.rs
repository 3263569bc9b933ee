//! # Razorpay Webhooks
//!
//! Parsing and dispatch for asynchronous gateway callbacks. The signature
//! over the raw body is verified by `signature::verify_webhook_signature`
//! before anything here runs.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use typedesk_core::{OrderError, OrderResult};

/// Webhook event kinds relevant to the order flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookKind {
    /// Payment captured by the gateway
    PaymentCaptured,
    /// Payment attempt failed
    PaymentFailed,
    /// All payments against an order completed
    OrderPaid,
    /// Anything else (passthrough)
    Unknown(String),
}

impl WebhookKind {
    fn from_event_name(name: &str) -> Self {
        match name {
            "payment.captured" => WebhookKind::PaymentCaptured,
            "payment.failed" => WebhookKind::PaymentFailed,
            "order.paid" => WebhookKind::OrderPaid,
            other => WebhookKind::Unknown(other.to_string()),
        }
    }
}

/// A parsed webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub kind: WebhookKind,
    /// Gateway payment id, when the payload carries one
    pub payment_id: Option<String>,
    /// Gateway order id, when the payload carries one
    pub remote_order_id: Option<String>,
    /// Amount in minor units, when the payload carries one
    pub amount_minor: Option<i64>,
    /// Raw payload for handlers that need more
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
struct RawWebhook {
    event: String,
    #[serde(default)]
    payload: Value,
}

/// Parse a verified webhook body into an event
pub fn parse_webhook_event(body: &[u8]) -> OrderResult<WebhookEvent> {
    let raw: RawWebhook = serde_json::from_slice(body)
        .map_err(|e| OrderError::WebhookRejected(format!("unparseable payload: {}", e)))?;

    let entity = raw
        .payload
        .get("payment")
        .and_then(|p| p.get("entity"))
        .or_else(|| raw.payload.get("order").and_then(|o| o.get("entity")));

    let payment_id = entity
        .and_then(|e| e.get("id"))
        .and_then(|v| v.as_str())
        .filter(|id| id.starts_with("pay_"))
        .map(String::from);

    let remote_order_id = entity
        .and_then(|e| e.get("order_id").or_else(|| e.get("id")))
        .and_then(|v| v.as_str())
        .filter(|id| id.starts_with("order_"))
        .map(String::from);

    let amount_minor = entity.and_then(|e| e.get("amount")).and_then(|v| v.as_i64());

    Ok(WebhookEvent {
        kind: WebhookKind::from_event_name(&raw.event),
        payment_id,
        remote_order_id,
        amount_minor,
        raw: raw.payload,
    })
}

/// Webhook event handler trait
#[allow(unused_variables)]
pub trait WebhookHandler: Send + Sync {
    fn on_payment_captured(&self, event: &WebhookEvent) -> OrderResult<()> {
        info!(
            "Payment captured: payment={:?}, order={:?}",
            event.payment_id, event.remote_order_id
        );
        Ok(())
    }

    fn on_payment_failed(&self, event: &WebhookEvent) -> OrderResult<()> {
        warn!(
            "Payment failed: payment={:?}, order={:?}",
            event.payment_id, event.remote_order_id
        );
        Ok(())
    }

    fn on_order_paid(&self, event: &WebhookEvent) -> OrderResult<()> {
        info!("Order paid: order={:?}", event.remote_order_id);
        Ok(())
    }

    fn on_unknown_event(&self, event: &WebhookEvent) -> OrderResult<()> {
        debug!("Unhandled webhook event: {:?}", event.kind);
        Ok(())
    }
}

/// Default handler that just logs events
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a parsed webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> OrderResult<()> {
    match &event.kind {
        WebhookKind::PaymentCaptured => handler.on_payment_captured(event),
        WebhookKind::PaymentFailed => handler.on_payment_failed(event),
        WebhookKind::OrderPaid => handler.on_order_paid(event),
        WebhookKind::Unknown(_) => handler.on_unknown_event(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn captured_body() -> Vec<u8> {
        json!({
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_Mabc123",
                        "order_id": "order_Nxyz123",
                        "amount": 2360,
                        "currency": "INR",
                        "status": "captured"
                    }
                }
            }
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn test_parse_payment_captured() {
        let event = parse_webhook_event(&captured_body()).unwrap();

        assert_eq!(event.kind, WebhookKind::PaymentCaptured);
        assert_eq!(event.payment_id.as_deref(), Some("pay_Mabc123"));
        assert_eq!(event.remote_order_id.as_deref(), Some("order_Nxyz123"));
        assert_eq!(event.amount_minor, Some(2360));
    }

    #[test]
    fn test_unknown_event_passthrough() {
        let body = json!({"event": "refund.processed", "payload": {}})
            .to_string()
            .into_bytes();
        let event = parse_webhook_event(&body).unwrap();

        assert_eq!(
            event.kind,
            WebhookKind::Unknown("refund.processed".to_string())
        );
        assert!(event.payment_id.is_none());
    }

    #[test]
    fn test_garbage_body_rejected() {
        let err = parse_webhook_event(b"not json").unwrap_err();
        assert!(matches!(err, OrderError::WebhookRejected(_)));
    }

    #[test]
    fn test_dispatch() {
        struct TestHandler {
            captured: std::sync::atomic::AtomicBool,
        }

        impl WebhookHandler for TestHandler {
            fn on_payment_captured(&self, _event: &WebhookEvent) -> OrderResult<()> {
                self.captured
                    .store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        }

        let handler = TestHandler {
            captured: std::sync::atomic::AtomicBool::new(false),
        };

        let event = parse_webhook_event(&captured_body()).unwrap();
        dispatch_webhook_event(&handler, &event).unwrap();

        assert!(handler.captured.load(std::sync::atomic::Ordering::SeqCst));
    }
}
