//! Prometheus metrics: HTTP request instrumentation, business counters for
//! the notification pipeline, and the exposition endpoint.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{header, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static PROMETHEUS: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Call once at startup, before anything
/// records a metric.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])
        .expect("bucket list is non-empty")
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if PROMETHEUS.set(handle).is_err() {
        panic!("metrics recorder installed twice");
    }
}

/// Record a counter and latency histogram for every request.
///
/// The path label uses the matched route pattern, not the raw URI, so
/// `/r/{tracking_id}` stays one series regardless of id.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let started = Instant::now();
    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// Count a notification send outcome on a channel.
pub fn record_notification(channel: &str, outcome: &'static str) {
    counter!(
        "notifications_total",
        "channel" => channel.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Count a terminal notification failure (permanent error or retries
/// exhausted); these are the rows surfaced for manual action.
pub fn record_terminal_failure(channel: &str) {
    counter!(
        "notifications_terminal_failures_total",
        "channel" => channel.to_string()
    )
    .increment(1);
}

/// Count a booking attributed to an earlier reminder.
pub fn record_conversion_linked() {
    counter!("conversions_linked_total").increment(1);
}

/// GET /metrics
pub async fn metrics_handler() -> Response {
    match PROMETHEUS.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "metrics recorder not installed",
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_counters_without_recorder() {
        // Recording against no installed recorder is a no-op, not a panic.
        record_notification("email", "sent");
        record_terminal_failure("sms");
        record_conversion_linked();
    }
}
