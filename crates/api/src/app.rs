//! Router assembly and shared application state.

use axum::routing::{get, post};
use axum::{middleware, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, SecurityConfig};
use crate::middleware::{metrics_handler, metrics_middleware, require_admin, trace_id};
use crate::routes::{admin, bookings, health, sweeps, tracking, webhooks};
use crate::services::{build_provider, DispatchService, SettingsCache};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub settings: SettingsCache,
    pub dispatch: Arc<DispatchService>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let provider = build_provider(&config.provider);
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        settings: SettingsCache::new(pool.clone()),
        dispatch: Arc::new(DispatchService::new(pool, provider)),
    };

    let admin_routes = admin_router()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    // Layer order is bottom-up: cors and the request span wrap everything,
    // the timeout cuts off slow handlers, compression applies last.
    Router::new()
        .merge(public_router())
        .merge(admin_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security))
        .with_state(state)
}

/// Routes reachable without the operator API key. The provider webhook
/// authenticates itself by HMAC signature instead.
fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/webhooks/provider", post(webhooks::provider_webhook))
        .route("/r/:tracking_id", get(tracking::click_through))
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler))
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/admin/quota", get(admin::get_quota))
        .route(
            "/api/v1/admin/notifications/failed",
            get(admin::list_failed_notifications),
        )
        .route("/api/v1/admin/connections", get(admin::list_connections))
        .route(
            "/api/v1/admin/connections/:channel/resume",
            post(admin::resume_connection),
        )
        .route(
            "/api/v1/admin/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
        .route(
            "/api/v1/admin/sweeps/reminders",
            post(sweeps::run_reminder_sweep),
        )
        .route("/api/v1/admin/sweeps/retries", post(sweeps::run_retry_sweep))
}

/// CORS from configuration; an empty origin list opens everything up for
/// development.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = security
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
