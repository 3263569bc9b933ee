//! # typedesk-api
//!
//! HTTP API layer for typedesk-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the order/payment pipeline and pricing
//! - Admin login shim and token-gated order listing
//! - Webhook handler for Razorpay events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/create-order` | Create a Razorpay order |
//! | POST | `/api/v1/verify-payment` | Verify a payment signature |
//! | POST | `/api/v1/save-order` | Persist a finalized order |
//! | POST | `/api/v1/quote` | Price breakdown |
//! | GET | `/api/v1/services` | Published rate table |
//! | POST | `/api/v1/admin/login` | Admin login |
//! | GET | `/api/v1/admin/orders` | Admin order listing |
//! | POST | `/webhook/razorpay` | Razorpay webhook |

pub mod admin;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
