//! Request correlation middleware.
//!
//! Every request runs inside a span tagged with a correlation id, taken
//! from the caller's `X-Request-ID` header or freshly generated. The id is
//! echoed on the response so clients and logs can be matched up.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

/// Correlation id header, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Correlation id made available to handlers via request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Attach a correlation id to the request and its span.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = std::time::Instant::now();
    let mut response = next.run(req).instrument(span).await;

    tracing::info!(
        request_id = %id,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-request-id"), value);
    }

    response
}
