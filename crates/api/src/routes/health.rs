//! Health probe handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DbProbe,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DbProbe {
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ProbeStatus {
    pub status: &'static str,
}

/// One round trip to the database, returning its latency when reachable.
async fn ping(pool: &PgPool) -> Option<u64> {
    let started = Instant::now();
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .ok()
        .map(|_| started.elapsed().as_millis() as u64)
}

/// Full health check: process up and database reachable.
///
/// GET /api/health
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, (StatusCode, Json<HealthReport>)> {
    let latency_ms = ping(&state.pool).await;
    let connected = latency_ms.is_some();

    let report = HealthReport {
        status: if connected { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        database: DbProbe {
            connected,
            latency_ms,
        },
    };

    if connected {
        Ok(Json(report))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(report)))
    }
}

/// Liveness: the process is running.
///
/// GET /api/health/live
pub async fn live() -> Json<ProbeStatus> {
    Json(ProbeStatus { status: "ok" })
}

/// Readiness: the database answers.
///
/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> Result<Json<ProbeStatus>, StatusCode> {
    if ping(&state.pool).await.is_some() {
        Ok(Json(ProbeStatus { status: "ready" }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
