//! # Routes
//!
//! Axum router configuration for the order/payment API.

use crate::admin;
use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Orders & payments:
///   - POST /api/v1/create-order - Create a Razorpay order
///   - POST /api/v1/verify-payment - Verify a payment signature
///   - POST /api/v1/save-order - Persist a finalized order
///
/// - Pricing:
///   - POST /api/v1/quote - Price breakdown for an order
///   - GET  /api/v1/services - Published rate table
///
/// - Admin:
///   - POST /api/v1/admin/login - Credential check, sets session cookie
///   - GET  /api/v1/admin/orders - Token-gated order listing
///
/// - Webhooks:
///   - POST /webhook/razorpay - Razorpay webhook handler
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the order form is served from a separate origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Order pipeline
        .route("/create-order", post(handlers::create_order))
        .route("/verify-payment", post(handlers::verify_payment))
        .route("/save-order", post(handlers::save_order))
        // Pricing
        .route("/quote", post(handlers::price_quote))
        .route("/services", get(handlers::list_services))
        // Admin
        .route("/admin/login", post(admin::login))
        .route("/admin/orders", get(admin::list_orders));

    // Webhook routes (no CORS, must accept raw body)
    let webhook_routes = Router::new().route("/razorpay", post(handlers::razorpay_webhook));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Webhooks
        .nest("/webhook", webhook_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
