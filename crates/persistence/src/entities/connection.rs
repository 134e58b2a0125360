//! Provider connection entity definition.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::notification::NotificationChannel;
use domain::models::{ConnectionState, ProviderConnection};

/// Database entity for the provider_connections table.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderConnectionEntity {
    pub id: i64,
    pub channel: NotificationChannel,
    pub state: ConnectionState,
    pub consecutive_failures: i32,
    pub paused_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProviderConnectionEntity> for ProviderConnection {
    fn from(e: ProviderConnectionEntity) -> Self {
        Self {
            id: e.id,
            channel: e.channel,
            state: e.state,
            consecutive_failures: e.consecutive_failures,
            paused_at: e.paused_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}
