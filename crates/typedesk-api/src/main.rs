//! # Typedesk
//!
//! Order and payment backend for the typing-services site.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//! export RAZORPAY_WEBHOOK_SECRET=...
//!
//! # Run the server
//! typedesk
//! ```

use typedesk_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Service rates loaded: {}", state.pricing.rates.len());
    info!("Payment provider: {}", state.gateway.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Typedesk starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Create order: POST http://{}/api/v1/create-order", addr);
        info!("Webhook: POST http://{}/webhook/razorpay", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
