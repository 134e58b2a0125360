//! Retry queue domain model and backoff schedule.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Maximum number of retries for a transiently failed notification.
/// Once `retry_count` reaches this value the entry is removed from the queue
/// and the attempt is marked failed.
pub const MAX_RETRIES: i32 = 3;

/// Fixed backoff schedule in seconds, indexed by `retry_count` at the time
/// the next retry is scheduled: 1 minute, 5 minutes, 15 minutes. The table
/// does not grow beyond the last entry.
pub const RETRY_BACKOFF_SECONDS: [i64; 3] = [60, 300, 900];

/// Delay before the next retry for an entry with the given retry count.
pub fn backoff_delay(retry_count: i32) -> Duration {
    let index = retry_count.clamp(0, RETRY_BACKOFF_SECONDS.len() as i32 - 1) as usize;
    Duration::seconds(RETRY_BACKOFF_SECONDS[index])
}

/// A queued retry for a transiently failed notification attempt.
///
/// Entries are deleted, never flagged, once terminal: either the retry
/// succeeded or `retry_count` reached [`MAX_RETRIES`].
#[derive(Debug, Clone)]
pub struct RetryQueueEntry {
    pub id: i64,
    pub attempt_id: Uuid,
    pub retry_count: i32,
    pub next_retry_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RetryQueueEntry {
    /// Whether this entry has exhausted its retries after one more failure.
    pub fn exhausted_after_failure(&self) -> bool {
        self.retry_count + 1 >= MAX_RETRIES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(RETRY_BACKOFF_SECONDS[0], 60); // 1 minute
        assert_eq!(RETRY_BACKOFF_SECONDS[1], 300); // 5 minutes
        assert_eq!(RETRY_BACKOFF_SECONDS[2], 900); // 15 minutes
    }

    #[test]
    fn test_max_retries() {
        assert_eq!(MAX_RETRIES, 3);
    }

    #[test]
    fn test_backoff_delay_indexing() {
        assert_eq!(backoff_delay(0), Duration::seconds(60));
        assert_eq!(backoff_delay(1), Duration::seconds(300));
        assert_eq!(backoff_delay(2), Duration::seconds(900));
    }

    #[test]
    fn test_backoff_delay_clamps_beyond_table() {
        // The schedule is fixed, not exponential; anything past the table
        // sticks to the last entry.
        assert_eq!(backoff_delay(3), Duration::seconds(900));
        assert_eq!(backoff_delay(100), Duration::seconds(900));
        assert_eq!(backoff_delay(-1), Duration::seconds(60));
    }

    fn entry_with_count(retry_count: i32) -> RetryQueueEntry {
        RetryQueueEntry {
            id: 1,
            attempt_id: Uuid::new_v4(),
            retry_count,
            next_retry_at: Utc::now(),
            last_error: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_exhausted_after_failure() {
        assert!(!entry_with_count(0).exhausted_after_failure());
        assert!(!entry_with_count(1).exhausted_after_failure());
        assert!(entry_with_count(2).exhausted_after_failure());
    }
}
