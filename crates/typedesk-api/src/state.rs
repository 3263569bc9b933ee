//! # Application State
//!
//! Shared state for the Axum application: the payment gateway, the order
//! store, the pricing table and the admin credentials. Everything is an
//! explicit value constructed once at startup, so tests run against doubles
//! with fixed rates and keys.

use crate::admin::AdminConfig;
use typedesk_core::{MemoryOrderStore, PricingConfig, SharedGateway, SharedOrderStore};
use typedesk_razorpay::RazorpayGateway;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway adapter
    pub gateway: SharedGateway,
    /// Order persistence (in-memory stand-in)
    pub store: SharedOrderStore,
    /// Pricing rate table
    pub pricing: PricingConfig,
    /// Admin credentials and token secret
    pub admin: AdminConfig,
    /// Secret for webhook-signature verification
    pub webhook_secret: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment with the Razorpay gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let pricing = load_pricing_config()?;
        let admin = AdminConfig::from_env();

        let gateway = RazorpayGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;

        // Razorpay lets the dashboard set a dedicated webhook secret; fall
        // back to the key secret as the original deployment did.
        let webhook_secret = std::env::var("RAZORPAY_WEBHOOK_SECRET")
            .unwrap_or_else(|_| gateway.config().key_secret.clone());

        Ok(Self {
            gateway: std::sync::Arc::new(gateway),
            store: std::sync::Arc::new(MemoryOrderStore::new()),
            pricing,
            admin,
            webhook_secret,
            config,
        })
    }

    /// Create state from explicit parts (for tests)
    pub fn with_parts(
        gateway: SharedGateway,
        store: SharedOrderStore,
        pricing: PricingConfig,
        admin: AdminConfig,
        webhook_secret: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            store,
            pricing,
            admin,
            webhook_secret: webhook_secret.into(),
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: "test".to_string(),
            },
        }
    }
}

/// Load the pricing table from config, falling back to the built-in rates
fn load_pricing_config() -> anyhow::Result<PricingConfig> {
    let config_paths = [
        "config/pricing.toml",
        "../config/pricing.toml",
        "../../config/pricing.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let pricing = PricingConfig::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} service rates from {}", pricing.rates.len(), path);
            return Ok(pricing);
        }
    }

    tracing::warn!("No pricing config found, using built-in rates");
    Ok(PricingConfig::default())
}
