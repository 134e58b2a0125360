//! Admin endpoint handlers.
//!
//! All routes here sit behind the admin API key middleware.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use domain::models::connection::ConnectionResponse;
use domain::models::notification::{
    FailedNotificationResponse, ListFailedNotificationsResponse, NotificationChannel,
};
use domain::models::settings::UpdateSettingsRequest;
use domain::models::{AppSettings, QuotaStatus};
use persistence::repositories::{
    NotificationAttemptRepository, ProviderConnectionRepository, QuotaCounterRepository,
    SettingsRepository,
};
use shared::pagination::PageParams;

use crate::app::AppState;
use crate::error::ApiError;

/// Today's quota status.
///
/// GET /api/v1/admin/quota
pub async fn get_quota(State(state): State<AppState>) -> Result<Json<QuotaStatus>, ApiError> {
    let settings = state.settings.current().await;
    let day = Utc::now().date_naive();

    let repo = QuotaCounterRepository::new(state.pool.clone());
    // A new UTC date implicitly starts a fresh counter at zero.
    let count = repo.get(day).await?.map(|e| e.count).unwrap_or(0);

    Ok(Json(QuotaStatus::compute(
        day,
        count,
        settings.quota_daily_limit,
        settings.quota_thresholds(),
    )))
}

/// Terminally failed notifications awaiting manual action.
///
/// GET /api/v1/admin/notifications/failed
pub async fn list_failed_notifications(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<ListFailedNotificationsResponse>, ApiError> {
    let repo = NotificationAttemptRepository::new(state.pool.clone());

    let entities = repo.list_failed(page.limit(), page.offset()).await?;
    let total = repo.count_failed().await?;

    let notifications = entities
        .into_iter()
        .map(|e| FailedNotificationResponse {
            attempt_id: e.attempt_id,
            customer_id: e.customer_id,
            channel: e.channel,
            recipient: e.recipient,
            template: e.template,
            last_error: e.last_error,
            created_at: e.created_at,
        })
        .collect();

    Ok(Json(ListFailedNotificationsResponse {
        notifications,
        total,
    }))
}

/// All provider connections with their pause state.
///
/// GET /api/v1/admin/connections
pub async fn list_connections(
    State(state): State<AppState>,
) -> Result<Json<Vec<ConnectionResponse>>, ApiError> {
    let repo = ProviderConnectionRepository::new(state.pool.clone());
    let connections = repo
        .list_all()
        .await?
        .into_iter()
        .map(|e| {
            let c: domain::models::ProviderConnection = e.into();
            c.into()
        })
        .collect();
    Ok(Json(connections))
}

/// Resume a paused connection. This is the only way back to active; there
/// is no automatic resume.
///
/// POST /api/v1/admin/connections/{channel}/resume
pub async fn resume_connection(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> Result<Json<ConnectionResponse>, ApiError> {
    let channel = NotificationChannel::parse(&channel)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown channel: {}", channel)))?;

    let repo = ProviderConnectionRepository::new(state.pool.clone());
    let entity = repo
        .resume(channel)
        .await?
        .ok_or_else(|| ApiError::NotFound("Connection not found".to_string()))?;

    info!(channel = %channel, "Connection resumed by administrator");

    let connection: domain::models::ProviderConnection = entity.into();
    Ok(Json(connection.into()))
}

/// Current operational settings.
///
/// GET /api/v1/admin/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, ApiError> {
    let repo = SettingsRepository::new(state.pool.clone());
    let settings: AppSettings = repo.get().await?.into();
    Ok(Json(settings))
}

/// Update operational settings (partial update).
///
/// PUT /api/v1/admin/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<AppSettings>, ApiError> {
    request.validate()?;

    let repo = SettingsRepository::new(state.pool.clone());
    let current: AppSettings = repo.get().await?.into();
    let updated = request.apply_to(&current);

    if !(updated.quota_warning_pct <= updated.quota_high_pct
        && updated.quota_high_pct <= updated.quota_critical_pct)
    {
        return Err(ApiError::Validation(
            "Quota thresholds must be ascending: warning <= high <= critical".to_string(),
        ));
    }

    let saved: AppSettings = repo.update(&updated).await?.into();
    state.settings.replace(saved.clone()).await;

    info!("Operational settings updated");

    Ok(Json(saved))
}
