//! # Request Handlers
//!
//! Axum request handlers for the order/payment API. Wire shapes match the
//! original site's JSON payloads (camelCase order fields, `razorpay_*`
//! verification parameters).

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};
use typedesk_core::{
    quote, Currency, FinalizedOrder, OrderError, RemoteOrderRequest, ServiceKind, Urgency,
};
use typedesk_razorpay::{
    dispatch_webhook_event, parse_webhook_event, verify_webhook_signature, LoggingWebhookHandler,
};

type HandlerError = (StatusCode, Json<Value>);

fn order_error_to_response(err: OrderError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "success": false, "error": err.to_string() })))
}

// =============================================================================
// Health
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "typedesk",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// =============================================================================
// Create order
// =============================================================================

/// Create-order request: amount in minor units (paise)
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

/// `POST /api/v1/create-order`
///
/// Creates a Razorpay order and returns it verbatim alongside the public
/// key id. The secret is never part of the response.
#[instrument(skip(state, request), fields(amount = request.amount))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Value>, HandlerError> {
    let amount = request.amount.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Amount is required" })),
        )
    })?;

    let currency = request.currency.unwrap_or(Currency::INR);
    let mut remote_request = RemoteOrderRequest::new(amount, currency);
    if let Some(receipt) = request.receipt {
        remote_request = remote_request.with_receipt(receipt);
    }
    remote_request.notes = request.notes;

    let order = state
        .gateway
        .create_remote_order(&remote_request)
        .await
        .map_err(|e| {
            error!("Failed to create remote order: {}", e);
            order_error_to_response(e)
        })?;

    info!("Created remote order: {}", order.id);

    Ok(Json(json!({
        "success": true,
        "order": {
            "id": order.id,
            "amount": order.amount_minor,
            "currency": order.currency.as_str(),
            "receipt": order.receipt,
        },
        "key": state.gateway.public_key(),
    })))
}

// =============================================================================
// Verify payment
// =============================================================================

/// Verification parameters as the hosted widget reports them
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// `POST /api/v1/verify-payment`
///
/// The only proof that a payment completed: missing fields are rejected
/// before any computation, and a mismatch is a 400 with `success: false`.
#[instrument(skip_all)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<Value>, HandlerError> {
    let (order_id, payment_id, signature) = match (
        request.razorpay_order_id.as_deref(),
        request.razorpay_payment_id.as_deref(),
        request.razorpay_signature.as_deref(),
    ) {
        (Some(o), Some(p), Some(s)) if !o.is_empty() && !p.is_empty() && !s.is_empty() => {
            (o, p, s)
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Missing payment verification parameters"
                })),
            ));
        }
    };

    let confirmation = typedesk_core::PaymentConfirmation {
        remote_order_id: order_id.to_string(),
        payment_id: payment_id.to_string(),
        signature: signature.to_string(),
    };

    let authentic = state
        .gateway
        .verify_payment(&confirmation)
        .map_err(order_error_to_response)?;

    if authentic {
        info!(payment_id = %payment_id, "payment verified");
        Ok(Json(json!({
            "success": true,
            "message": "Payment verified successfully"
        })))
    } else {
        warn!(payment_id = %payment_id, "payment signature mismatch");
        Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": "Payment verification failed"
            })),
        ))
    }
}

// =============================================================================
// Save order
// =============================================================================

/// `POST /api/v1/save-order`
///
/// Persists a finalized order. Stand-in for durable storage: requires
/// `orderId`, `name` and `email` at minimum.
#[instrument(skip_all)]
pub async fn save_order(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, HandlerError> {
    for field in ["orderId", "name", "email"] {
        let present = body
            .get(field)
            .and_then(|v| v.as_str())
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        if !present {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": "Missing required order fields"
                })),
            ));
        }
    }

    let order: FinalizedOrder = serde_json::from_value(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": format!("Malformed order: {}", e)
            })),
        )
    })?;

    let order_id = order.draft.order_id.clone().unwrap_or_default();

    state.store.persist(&order).await.map_err(|e| {
        error!(order_id = %order_id, "failed to persist order: {}", e);
        order_error_to_response(e)
    })?;

    info!(
        order_id = %order_id,
        customer = %order.draft.name,
        paid = order.is_paid(),
        "order saved"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Order saved successfully",
        "orderId": order_id,
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

// =============================================================================
// Quotes & services
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub service: ServiceKind,
    #[serde(default = "default_pages")]
    pub pages: u32,
    #[serde(default)]
    pub urgency: Urgency,
}

fn default_pages() -> u32 {
    1
}

/// `POST /api/v1/quote`: price breakdown for the order form
pub async fn price_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Value>, HandlerError> {
    // The engine assumes a valid positive count; clamp at the boundary
    let pages = request.pages.max(1);

    let breakdown = quote(&state.pricing, request.service, pages, request.urgency)
        .map_err(order_error_to_response)?;

    Ok(Json(json!({
        "success": true,
        "service": request.service,
        "pages": pages,
        "urgency": request.urgency,
        "quote": breakdown.rounded(),
        "currency": Currency::INR,
    })))
}

/// `GET /api/v1/services`: the published rate table
pub async fn list_services(State(state): State<AppState>) -> impl IntoResponse {
    let services: Vec<Value> = ServiceKind::all()
        .iter()
        .filter_map(|&kind| {
            state.pricing.rate(kind).ok().map(|rate| {
                json!({
                    "service": kind,
                    "name": kind.display_name(),
                    "base": rate.base,
                    "unit": rate.unit,
                })
            })
        })
        .collect();

    let count = services.len();
    Json(json!({ "services": services, "count": count }))
}

// =============================================================================
// Webhook
// =============================================================================

/// `POST /webhook/razorpay`
///
/// Verifies the signature over the raw body before any parsing, then
/// dispatches the event.
#[instrument(skip_all)]
pub async fn razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let signature = headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing X-Razorpay-Signature header" })),
            )
        })?;

    let authentic = verify_webhook_signature(&body, signature, &state.webhook_secret)
        .map_err(order_error_to_response)?;

    if !authentic {
        warn!("webhook signature rejected");
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Webhook signature verification failed" })),
        ));
    }

    let event = parse_webhook_event(&body).map_err(order_error_to_response)?;
    info!("Received webhook: kind={:?}", event.kind);

    dispatch_webhook_event(&LoggingWebhookHandler, &event).map_err(|e| {
        error!("Webhook handler error: {}", e);
        order_error_to_response(e)
    })?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminConfig;
    use async_trait::async_trait;
    use typedesk_core::{
        MemoryOrderStore, OrderResult, PaymentConfirmation, PaymentGateway, PricingConfig,
        RemoteOrder,
    };
    use typedesk_razorpay::payment_signature;

    const SECRET: &str = "test_secret";

    struct StubGateway {
        fail_create: bool,
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn create_remote_order(
            &self,
            request: &RemoteOrderRequest,
        ) -> OrderResult<RemoteOrder> {
            request.validate()?;
            if self.fail_create {
                return Err(OrderError::Gateway {
                    provider: "razorpay".to_string(),
                    message: "upstream unavailable".to_string(),
                });
            }
            Ok(RemoteOrder {
                id: "order_stub1".to_string(),
                amount_minor: request.amount_minor,
                currency: request.currency,
                receipt: request.receipt.clone(),
            })
        }

        fn verify_payment(&self, confirmation: &PaymentConfirmation) -> OrderResult<bool> {
            typedesk_razorpay::verify_payment_signature(
                &confirmation.remote_order_id,
                &confirmation.payment_id,
                &confirmation.signature,
                SECRET,
            )
        }

        fn public_key(&self) -> &str {
            "rzp_test_stub"
        }

        fn provider_name(&self) -> &'static str {
            "stub"
        }
    }

    fn test_state(fail_create: bool) -> AppState {
        AppState::with_parts(
            std::sync::Arc::new(StubGateway { fail_create }),
            std::sync::Arc::new(MemoryOrderStore::new()),
            PricingConfig::default(),
            AdminConfig::new("admin", "admin123", "token-secret"),
            SECRET,
        )
    }

    #[tokio::test]
    async fn test_create_order_success() {
        let state = test_state(false);
        let request = CreateOrderRequest {
            amount: Some(2360),
            currency: None,
            receipt: Some("receipt_TS-00000001".to_string()),
            notes: HashMap::new(),
        };

        let Json(body) = create_order(State(state), Json(request)).await.unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["order"]["id"], "order_stub1");
        assert_eq!(body["order"]["amount"], 2360);
        assert_eq!(body["order"]["currency"], "INR");
        assert_eq!(body["key"], "rzp_test_stub");
    }

    #[tokio::test]
    async fn test_create_order_requires_amount() {
        let state = test_state(false);
        let request = CreateOrderRequest {
            amount: None,
            currency: None,
            receipt: None,
            notes: HashMap::new(),
        };

        let (status, Json(body)) = create_order(State(state), Json(request))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Amount is required");
    }

    #[tokio::test]
    async fn test_create_order_rejects_zero_amount() {
        let state = test_state(false);
        let request = CreateOrderRequest {
            amount: Some(0),
            currency: None,
            receipt: None,
            notes: HashMap::new(),
        };

        let (status, _) = create_order(State(state), Json(request))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_order_surfaces_gateway_failure() {
        let state = test_state(true);
        let request = CreateOrderRequest {
            amount: Some(2360),
            currency: None,
            receipt: None,
            notes: HashMap::new(),
        };

        let (status, Json(body)) = create_order(State(state), Json(request))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_verify_payment_genuine() {
        let state = test_state(false);
        let sig = payment_signature("order_stub1", "pay_abc", SECRET);

        let request = VerifyPaymentRequest {
            razorpay_order_id: Some("order_stub1".to_string()),
            razorpay_payment_id: Some("pay_abc".to_string()),
            razorpay_signature: Some(sig),
        };

        let Json(body) = verify_payment(State(state), Json(request)).await.unwrap();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_verify_payment_tampered() {
        let state = test_state(false);

        let request = VerifyPaymentRequest {
            razorpay_order_id: Some("order_stub1".to_string()),
            razorpay_payment_id: Some("pay_abc".to_string()),
            razorpay_signature: Some("00".repeat(32)),
        };

        let (status, Json(body)) = verify_payment(State(state), Json(request))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_verify_payment_missing_fields() {
        let state = test_state(false);

        let request = VerifyPaymentRequest {
            razorpay_order_id: Some("order_stub1".to_string()),
            razorpay_payment_id: None,
            razorpay_signature: Some("abc".to_string()),
        };

        let (status, Json(body)) = verify_payment(State(state), Json(request))
            .await
            .unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing payment verification parameters");
    }

    #[tokio::test]
    async fn test_save_order_round_trip() {
        let state = test_state(false);
        let body = json!({
            "orderId": "TS-00000001",
            "service": "document",
            "pages": 10,
            "urgency": "standard",
            "fileType": "docx",
            "instructions": "",
            "name": "Asha Verma",
            "email": "asha@example.com",
            "phone": "9876543210",
            "college": "",
            "address": "",
            "newsletter": false,
            "terms": true,
            "status": "processing",
            "price": 23.6,
            "createdAt": "2026-08-23T10:00:00Z",
            "payment": {
                "transactionId": "pay_abc",
                "remoteOrderId": "order_stub1",
                "amount": 2360,
                "status": "completed",
                "timestamp": "2026-08-23T10:05:00Z"
            }
        });

        let Json(response) = save_order(State(state.clone()), Json(body)).await.unwrap();

        assert_eq!(response["success"], true);
        assert_eq!(response["orderId"], "TS-00000001");
        assert!(response["timestamp"].is_string());

        let saved = state.store.list().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].is_paid());
    }

    #[tokio::test]
    async fn test_save_order_missing_fields() {
        let state = test_state(false);
        let body = json!({ "orderId": "TS-00000001", "name": "Asha" });

        let (status, Json(response)) = save_order(State(state), Json(body)).await.unwrap_err();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing required order fields");
    }

    #[tokio::test]
    async fn test_quote_endpoint_rounds_for_display() {
        let state = test_state(false);
        let request = QuoteRequest {
            service: ServiceKind::Document,
            pages: 10,
            urgency: Urgency::Standard,
        };

        let Json(body) = price_quote(State(state), Json(request)).await.unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["quote"]["subtotal"], 20.0);
        assert_eq!(body["quote"]["tax"], 3.6);
        assert_eq!(body["quote"]["total"], 23.6);
    }

    #[tokio::test]
    async fn test_quote_clamps_pages() {
        let state = test_state(false);
        let request = QuoteRequest {
            service: ServiceKind::Thesis,
            pages: 0,
            urgency: Urgency::Standard,
        };

        let Json(body) = price_quote(State(state), Json(request)).await.unwrap();
        assert_eq!(body["pages"], 1);
    }

    #[tokio::test]
    async fn test_list_services() {
        let state = test_state(false);
        let response = list_services(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_signature() {
        let state = test_state(false);
        let body = Bytes::from_static(br#"{"event":"payment.captured","payload":{}}"#);

        let mut headers = HeaderMap::new();
        headers.insert("x-razorpay-signature", "00".repeat(32).parse().unwrap());

        let (status, _) = razorpay_webhook(State(state), headers, body)
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_webhook_accepts_genuine_signature() {
        let state = test_state(false);
        let payload = br#"{"event":"payment.captured","payload":{}}"#;
        let sig = typedesk_razorpay::signature::compute_hmac_sha256(SECRET, payload);

        let mut headers = HeaderMap::new();
        headers.insert("x-razorpay-signature", sig.parse().unwrap());

        let status = razorpay_webhook(State(state), headers, Bytes::from_static(payload))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }
}
