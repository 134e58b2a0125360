//! Query timing metrics for repository operations.

use metrics::histogram;
use std::time::Instant;

/// Times a database query and records it as a histogram labeled by query
/// name when dropped via [`QueryTimer::record`].
pub struct QueryTimer {
    name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let elapsed = self.start.elapsed().as_secs_f64();
        histogram!("db_query_duration_seconds", "query" => self.name).record(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_records_without_panic() {
        let timer = QueryTimer::new("test_query");
        timer.record();
    }
}
