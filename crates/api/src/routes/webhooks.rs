//! Provider webhook handler.
//!
//! The message provider posts delivery receipts, failure reports, and click
//! events. The raw body is verified against an HMAC-SHA256 signature before
//! anything is parsed.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use persistence::repositories::TrackingLinkRepository;
use shared::crypto::verify_signature;

use crate::app::AppState;
use crate::error::ApiError;

/// Signature header set by the provider.
pub const SIGNATURE_HEADER: &str = "X-Provider-Signature";

/// Event payload from the provider.
#[derive(Debug, Deserialize)]
struct ProviderEvent {
    event: String,
    #[serde(default)]
    attempt_id: Option<Uuid>,
    #[serde(default)]
    tracking_id: Option<Uuid>,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    reason: Option<String>,
}

/// Ingest one provider event.
///
/// POST /api/v1/webhooks/provider
pub async fn provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !verify_signature(&state.config.provider.webhook_secret, &body, signature) {
        return Err(ApiError::Unauthorized(
            "Invalid webhook signature".to_string(),
        ));
    }

    let event: ProviderEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Malformed webhook payload: {}", e)))?;

    let settings = state.settings.current().await;

    match event.event.as_str() {
        "delivered" => {
            if let Some(attempt_id) = event.attempt_id {
                state.dispatch.record_webhook_delivered(attempt_id).await?;
                info!(attempt_id = %attempt_id, "Delivery receipt recorded");
            }
        }
        "failed" => {
            if let Some(attempt_id) = event.attempt_id {
                let reason = event.reason.as_deref().unwrap_or("provider reported failure");
                state
                    .dispatch
                    .record_webhook_failure(attempt_id, event.status_code, reason, &settings)
                    .await?;
            }
        }
        "clicked" => {
            if let Some(tracking_id) = event.tracking_id {
                let repo = TrackingLinkRepository::new(state.pool.clone());
                let recorded = repo.record_click(tracking_id, Utc::now()).await?;
                if recorded.is_some() {
                    info!(tracking_id = %tracking_id, "Click recorded via webhook");
                }
            }
        }
        other => {
            // Unknown event types are acknowledged and ignored; the
            // provider adds kinds we do not care about.
            debug!(event = other, "Ignoring unhandled provider event");
        }
    }

    Ok(Json(json!({ "received": true })))
}
