//! API error type and HTTP mapping.
//!
//! Validation and permanent errors surface as 4xx with a human-readable
//! message; internal trouble is logged and reported as an opaque 500.
//! Transient provider failures never reach this type; they are absorbed
//! into the retry queue by the dispatch service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation_error",
            ApiError::Internal(_) => "internal_error",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Internal detail stays in the logs, not the response.
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "internal error");
                "An internal error occurred".to_string()
            }
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Conflict(m)
            | ApiError::Validation(m)
            | ApiError::ServiceUnavailable(m) => m.clone(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // Unique violation.
                Some("23505") => ApiError::Conflict("Resource already exists".to_string()),
                // Foreign key violation.
                Some("23503") => ApiError::NotFound("Referenced resource not found".to_string()),
                _ => ApiError::Internal(err.to_string()),
            },
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<crate::services::dispatch::DispatchError> for ApiError {
    fn from(err: crate::services::dispatch::DispatchError) -> Self {
        match err {
            crate::services::dispatch::DispatchError::Database(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for e in field_errors {
                let detail = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                parts.push(format!("{field}: {detail}"));
            }
        }
        ApiError::Validation(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthorized("k".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("c".into()), StatusCode::CONFLICT),
            (ApiError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::Internal("i".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::ServiceUnavailable("s".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::Validation("x".into()).code(), "validation_error");
        assert_eq!(ApiError::NotFound("x".into()).code(), "not_found");
        assert_eq!(ApiError::Internal("x".into()).code(), "internal_error");
    }

    #[test]
    fn test_display_keeps_detail() {
        assert_eq!(
            ApiError::Validation("service is blank".into()).to_string(),
            "Validation error: service is blank"
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }

    #[test]
    fn test_validation_errors_collect_messages() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "must not be empty"))]
            name: String,
        }

        let probe = Probe {
            name: String::new(),
        };
        let error: ApiError = probe.validate().unwrap_err().into();
        let text = error.to_string();
        assert!(text.contains("name"));
        assert!(text.contains("must not be empty"));
    }
}
