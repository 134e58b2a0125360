//! Message provider implementations.
//!
//! `HttpProvider` talks to the email/SMS gateway; `ConsoleProvider` logs
//! messages for development. Both implement the domain `MessageProvider`
//! trait so dispatch logic never sees the transport.

use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use domain::services::messaging::{MessageProvider, OutboundMessage, ProviderError, SendReceipt};

use crate::config::ProviderConfig;

/// Build the configured provider.
pub fn build_provider(config: &ProviderConfig) -> Arc<dyn MessageProvider> {
    match config.mode.as_str() {
        "http" => Arc::new(HttpProvider::new(
            &config.base_url,
            &config.api_key,
            config.timeout_secs,
        )),
        _ => Arc::new(ConsoleProvider),
    }
}

/// Provider that delivers through an HTTP message gateway.
pub struct HttpProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    message_id: Option<String>,
}

impl HttpProvider {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MessageProvider for HttpProvider {
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else if e.is_builder() {
                    ProviderError::BuildRequest(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut detail = body.trim().to_string();
            detail.truncate(200);
            return Err(ProviderError::Http {
                status: status.as_u16(),
                message: detail,
            });
        }

        let receipt: GatewayResponse = response.json().await.unwrap_or(GatewayResponse {
            message_id: None,
        });

        Ok(SendReceipt {
            provider_message_id: receipt.message_id,
        })
    }
}

/// Development provider that logs instead of sending.
pub struct ConsoleProvider;

#[async_trait::async_trait]
impl MessageProvider for ConsoleProvider {
    async fn send(&self, message: &OutboundMessage) -> Result<SendReceipt, ProviderError> {
        info!(
            channel = %message.channel,
            recipient = %message.recipient,
            template = %message.template,
            subject = message.subject.as_deref().unwrap_or(""),
            "Console provider: message not actually sent"
        );
        Ok(SendReceipt {
            provider_message_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::notification::{NotificationChannel, TemplateKind};

    fn message() -> OutboundMessage {
        OutboundMessage {
            channel: NotificationChannel::Email,
            recipient: "dana@example.com".to_string(),
            template: TemplateKind::GroomReminder,
            subject: Some("Time for a groom?".to_string()),
            body: "Hello".to_string(),
            tracking_id: None,
        }
    }

    #[tokio::test]
    async fn test_console_provider_always_accepts() {
        let provider = ConsoleProvider;
        let receipt = provider.send(&message()).await.unwrap();
        assert!(receipt.provider_message_id.is_none());
    }

    #[test]
    fn test_http_provider_trims_base_url() {
        let provider = HttpProvider::new("https://gateway.test/", "key", 5);
        assert_eq!(provider.base_url, "https://gateway.test");
    }

    #[tokio::test]
    async fn test_http_provider_unreachable_host_is_not_permanent() {
        // Port 9 on localhost is effectively never listening; the error must
        // classify as transient so the attempt enters the retry queue.
        let provider = HttpProvider::new("http://127.0.0.1:9", "key", 1);
        let err = provider.send(&message()).await.unwrap_err();
        assert!(err.class().is_transient(), "got {err:?}");
    }
}
