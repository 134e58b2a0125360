//! Provider connection model and pause state machine.
//!
//! Each outbound channel has one connection row. A connection pauses itself
//! after a streak of consecutive send failures and stays paused until an
//! administrator resumes it; there is no automatic resume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::notification::NotificationChannel;

/// Default number of consecutive failures that pauses a connection.
pub const DEFAULT_PAUSE_THRESHOLD: i32 = 10;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "connection_state", rename_all = "snake_case")]
pub enum ConnectionState {
    Active,
    Paused,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Active => "active",
            ConnectionState::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ConnectionState::Active),
            "paused" => Some(ConnectionState::Paused),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound provider connection for a single channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConnection {
    pub id: i64,
    pub channel: NotificationChannel,
    pub state: ConnectionState,
    pub consecutive_failures: i32,
    pub paused_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProviderConnection {
    /// Whether sends on this channel are currently allowed.
    pub fn is_active(&self) -> bool {
        self.state == ConnectionState::Active
    }

    /// Whether the failure counter has reached the pause threshold.
    ///
    /// The consecutive-failure counter is the only signal driving the
    /// transition; quota never feeds this machine.
    pub fn should_pause(consecutive_failures: i32, threshold: i32) -> bool {
        consecutive_failures >= threshold
    }
}

/// Response payload for connection listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionResponse {
    pub channel: NotificationChannel,
    pub state: ConnectionState,
    pub consecutive_failures: i32,
    pub paused_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProviderConnection> for ConnectionResponse {
    fn from(c: ProviderConnection) -> Self {
        Self {
            channel: c.channel,
            state: c.state,
            consecutive_failures: c.consecutive_failures,
            paused_at: c.paused_at,
            updated_at: c.updated_at,
        }
    }
}
