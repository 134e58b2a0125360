//! Sweep trigger handlers.
//!
//! Periodic work is triggered externally (a systemd timer or external cron
//! hitting these endpoints); the service runs no scheduler of its own.

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::dispatch::RetrySweepReport;
use crate::services::reminders::{ReminderSweepReport, ReminderSweepService};

/// Run one breed-based reminder sweep.
///
/// POST /api/v1/admin/sweeps/reminders
pub async fn run_reminder_sweep(
    State(state): State<AppState>,
) -> Result<Json<ReminderSweepReport>, ApiError> {
    let settings = state.settings.current().await;
    let service = ReminderSweepService::new(
        state.pool.clone(),
        state.dispatch.clone(),
        &state.config.tracking.click_base_url,
    );
    let report = service.run(&settings).await?;
    Ok(Json(report))
}

/// Process one batch of due retry queue entries.
///
/// POST /api/v1/admin/sweeps/retries
pub async fn run_retry_sweep(
    State(state): State<AppState>,
) -> Result<Json<RetrySweepReport>, ApiError> {
    let settings = state.settings.current().await;
    let report = state
        .dispatch
        .process_due_retries(state.config.sweeps.retry_batch_size, &settings)
        .await?;
    Ok(Json(report))
}
