//! Admin authentication middleware.
//!
//! There is a single operator credential: an API key presented in the
//! `X-API-Key` header and compared by SHA-256 digest, so the plaintext key
//! never appears in configuration.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use shared::crypto::sha256_hex;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the operator API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Gate for admin-only routes.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if sha256_hex(key) == state.config.security.admin_api_key_sha256 => {
            Ok(next.run(req).await)
        }
        _ => Err(ApiError::Unauthorized(
            "Invalid or missing API key".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_comparison() {
        // Digest of "test", as baked into the test configuration.
        let configured = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";
        assert_eq!(sha256_hex("test"), configured);
        assert_ne!(sha256_hex("wrong-key"), configured);
    }
}
