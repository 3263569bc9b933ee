//! # Admin Login Shim
//!
//! Credential check plus an HMAC-signed session token with a 24h expiry.
//! A deliberate shim for the admin panel, not a hardened session design:
//! the order pipeline does not depend on it.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_TTL_HOURS: i64 = 24;

/// Admin credentials and the token-signing secret
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub token_secret: String,
}

impl AdminConfig {
    /// Load from environment, with the original deployment's defaults
    pub fn from_env() -> Self {
        Self {
            username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string()),
            token_secret: std::env::var("ADMIN_TOKEN_SECRET")
                .unwrap_or_else(|_| "change-this-secret".to_string()),
        }
    }

    /// Explicit values (for tests)
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token_secret: token_secret.into(),
        }
    }
}

/// Sign a session token: `username:expiry_unix:hex(hmac(secret, payload))`
pub fn issue_token(config: &AdminConfig, username: &str, now: DateTime<Utc>) -> String {
    let expires = (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp();
    let payload = format!("{}:{}", username, expires);
    format!("{}:{}", payload, sign(&config.token_secret, &payload))
}

/// Verify a session token: signature must match and the expiry must be in
/// the future. Returns the username on success.
pub fn verify_token(config: &AdminConfig, token: &str, now: DateTime<Utc>) -> Option<String> {
    let mut parts = token.splitn(3, ':');
    let username = parts.next()?;
    let expires: i64 = parts.next()?.parse().ok()?;
    let signature = parts.next()?;

    let payload = format!("{}:{}", username, expires);
    if !constant_time_eq(&sign(&config.token_secret, &payload), signature) {
        return None;
    }
    if expires <= now.timestamp() {
        return None;
    }
    Some(username.to_string())
}

fn sign(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/v1/admin/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let admin = &state.admin;
    let credentials_ok = constant_time_eq(&request.username, &admin.username)
        && constant_time_eq(&request.password, &admin.password);

    if !credentials_ok {
        warn!(username = %request.username, "admin login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "error": "Invalid username or password"
            })),
        )
            .into_response();
    }

    let token = issue_token(admin, &request.username, Utc::now());
    let cookie = format!(
        "admin_token={}; HttpOnly; Path=/; Max-Age=86400; SameSite=Strict",
        token
    );

    info!(username = %request.username, "admin login");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "success": true,
            "message": "Login successful",
            "user": { "username": request.username, "role": "admin" }
        })),
    )
        .into_response()
}

/// `GET /api/v1/admin/orders`: token-gated order listing
pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let token = extract_token(&headers).ok_or_else(|| unauthorized("Missing admin token"))?;

    verify_token(&state.admin, &token, Utc::now())
        .ok_or_else(|| unauthorized("Invalid or expired admin token"))?;

    let orders = state.store.list().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": e.to_string() })),
        )
    })?;

    let count = orders.len();
    Ok(Json(json!({
        "success": true,
        "orders": orders,
        "count": count
    })))
}

/// Pull the token from the `admin_token` cookie or a bearer header
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookie_header.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == "admin_token" {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn unauthorized(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "error": message })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AdminConfig {
        AdminConfig::new("admin", "admin123", "test-secret")
    }

    #[test]
    fn test_token_round_trip() {
        let now = Utc::now();
        let token = issue_token(&config(), "admin", now);

        assert_eq!(verify_token(&config(), &token, now), Some("admin".to_string()));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issued = Utc::now();
        let token = issue_token(&config(), "admin", issued);

        let later = issued + Duration::hours(TOKEN_TTL_HOURS + 1);
        assert_eq!(verify_token(&config(), &token, later), None);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let now = Utc::now();
        let token = issue_token(&config(), "admin", now);

        // Change the claimed username without re-signing
        let forged = token.replacen("admin", "mallory", 1);
        assert_eq!(verify_token(&config(), &forged, now), None);

        // Signature from a different secret
        let other = AdminConfig::new("admin", "admin123", "other-secret");
        let foreign = issue_token(&other, "admin", now);
        assert_eq!(verify_token(&config(), &foreign, now), None);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(verify_token(&config(), "", Utc::now()), None);
        assert_eq!(verify_token(&config(), "a:b", Utc::now()), None);
        assert_eq!(verify_token(&config(), "a:notanumber:ff", Utc::now()), None);
    }

    #[test]
    fn test_cookie_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; admin_token=abc:123:def".parse().unwrap(),
        );
        assert_eq!(extract_token(&headers), Some("abc:123:def".to_string()));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer xyz".parse().unwrap());
        assert_eq!(extract_token(&headers), Some("xyz".to_string()));
    }
}
