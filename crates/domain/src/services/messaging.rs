//! Outbound message provider abstraction.
//!
//! The API layer supplies concrete providers (HTTP gateway, console for
//! development); dispatch logic only sees this trait.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::notification::{ErrorClass, NotificationChannel, TemplateKind};

/// A rendered message ready for the provider.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundMessage {
    pub channel: NotificationChannel,
    pub recipient: String,
    pub template: TemplateKind,
    pub subject: Option<String>,
    pub body: String,
    pub tracking_id: Option<Uuid>,
}

/// Receipt for an accepted message.
#[derive(Debug, Clone)]
pub struct SendReceipt {
    /// Provider-side message identifier, when the provider returns one.
    pub provider_message_id: Option<String>,
}

/// Errors from a message provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to build provider request: {0}")]
    BuildRequest(String),
}

impl ProviderError {
    /// Classify this failure for retry purposes.
    ///
    /// HTTP statuses go through the status table; network trouble and
    /// timeouts are transient; a request we could not even build is a
    /// programming/configuration problem and will not fix itself.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProviderError::Http { status, .. } => ErrorClass::from_status(*status),
            ProviderError::Network(_) | ProviderError::Timeout => ErrorClass::Transient,
            ProviderError::BuildRequest(_) => ErrorClass::Permanent,
        }
    }
}

/// Message provider trait.
#[async_trait::async_trait]
pub trait MessageProvider: Send + Sync {
    /// Deliver one message. Ok means the provider accepted it.
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_classification() {
        let permanent = ProviderError::Http {
            status: 401,
            message: "bad key".to_string(),
        };
        assert_eq!(permanent.class(), ErrorClass::Permanent);

        let transient = ProviderError::Http {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(transient.class(), ErrorClass::Transient);

        let rate_limited = ProviderError::Http {
            status: 429,
            message: "slow down".to_string(),
        };
        assert_eq!(rate_limited.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_network_and_timeout_are_transient() {
        assert_eq!(
            ProviderError::Network("connection refused".to_string()).class(),
            ErrorClass::Transient
        );
        assert_eq!(ProviderError::Timeout.class(), ErrorClass::Transient);
    }

    #[test]
    fn test_build_request_is_permanent() {
        assert_eq!(
            ProviderError::BuildRequest("no recipient".to_string()).class(),
            ErrorClass::Permanent
        );
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Provider returned HTTP 503: unavailable");
        assert_eq!(ProviderError::Timeout.to_string(), "Request timed out");
    }
}
