//! Click-through redirect handler.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use persistence::repositories::TrackingLinkRepository;

use crate::app::AppState;

/// Resolve a tracking link click.
///
/// GET /r/{tracking_id}
///
/// Idempotent: only the first click stamps `clicked_at`. Unknown or
/// malformed ids redirect to the safe default destination without touching
/// any record.
pub async fn click_through(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
) -> Redirect {
    let Ok(tracking_id) = Uuid::parse_str(&tracking_id) else {
        debug!(tracking_id = %tracking_id, "Malformed tracking id");
        return Redirect::temporary(&state.config.tracking.default_redirect_url);
    };

    let repo = TrackingLinkRepository::new(state.pool.clone());
    match repo.record_click(tracking_id, Utc::now()).await {
        Ok(Some(link)) => {
            info!(
                tracking_id = %tracking_id,
                customer_id = %link.customer_id,
                "Tracking link clicked"
            );
            Redirect::temporary(&state.config.tracking.destination_url)
        }
        Ok(None) => {
            // Either already clicked (keep the first timestamp) or unknown.
            match repo.find_by_tracking_id(tracking_id).await {
                Ok(Some(_)) => Redirect::temporary(&state.config.tracking.destination_url),
                _ => {
                    debug!(tracking_id = %tracking_id, "Unknown tracking id");
                    Redirect::temporary(&state.config.tracking.default_redirect_url)
                }
            }
        }
        Err(e) => {
            warn!(tracking_id = %tracking_id, error = %e, "Click recording failed");
            Redirect::temporary(&state.config.tracking.default_redirect_url)
        }
    }
}
