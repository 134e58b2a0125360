//! Conversion tracking link model.
//!
//! A tracking link correlates an outbound reminder with a later booking.
//! It is created at send time, optionally clicked (first click wins), and
//! linked to at most one booking inside the attribution window.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::notification::NotificationChannel;

/// Default attribution window in days.
pub const DEFAULT_CONVERSION_WINDOW_DAYS: i64 = 30;

/// Earliest creation time a link may have to be attributable to a booking
/// created at `booking_created_at`.
pub fn attribution_window_start(
    booking_created_at: DateTime<Utc>,
    window_days: i64,
) -> DateTime<Utc> {
    booking_created_at - Duration::days(window_days)
}

/// A conversion tracking link.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackingLink {
    pub id: i64,
    pub tracking_id: Uuid,
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub created_at: DateTime<Utc>,
    pub clicked_at: Option<DateTime<Utc>>,
    pub booking_id: Option<Uuid>,
    pub linked_at: Option<DateTime<Utc>>,
}

impl TrackingLink {
    /// Whether this link has already been consumed by a booking.
    pub fn is_linked(&self) -> bool {
        self.booking_id.is_some()
    }

    /// Whether this link falls inside the attribution window for a booking
    /// created at the given time.
    pub fn in_window(&self, booking_created_at: DateTime<Utc>, window_days: i64) -> bool {
        self.created_at >= attribution_window_start(booking_created_at, window_days)
            && self.created_at <= booking_created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(created_at: DateTime<Utc>) -> TrackingLink {
        TrackingLink {
            id: 1,
            tracking_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            channel: NotificationChannel::Sms,
            created_at,
            clicked_at: None,
            booking_id: None,
            linked_at: None,
        }
    }

    #[test]
    fn test_window_start() {
        let booked = Utc::now();
        let start = attribution_window_start(booked, 30);
        assert_eq!(booked - start, Duration::days(30));
    }

    #[test]
    fn test_link_inside_window() {
        let booked = Utc::now();
        assert!(link(booked - Duration::days(2)).in_window(booked, 30));
        assert!(link(booked - Duration::days(29)).in_window(booked, 30));
    }

    #[test]
    fn test_link_outside_window() {
        let booked = Utc::now();
        assert!(!link(booked - Duration::days(31)).in_window(booked, 30));
        // Links created after the booking are not attributable to it.
        assert!(!link(booked + Duration::hours(1)).in_window(booked, 30));
    }

    #[test]
    fn test_is_linked() {
        let mut l = link(Utc::now());
        assert!(!l.is_linked());
        l.booking_id = Some(Uuid::new_v4());
        assert!(l.is_linked());
    }
}
