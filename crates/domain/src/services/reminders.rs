//! Reminder scheduling rules.
//!
//! Grooming cadence depends on coat type, so the recommended re-groom
//! interval is keyed off the recorded breed. Matching is substring-based on
//! the lowercased breed name; unknown breeds get the default interval.

use chrono::{DateTime, Duration, Utc};

use crate::models::customer::Customer;

/// Default re-groom interval when the breed is unknown (6 weeks).
pub const DEFAULT_INTERVAL_DAYS: i64 = 42;

/// Curly/continuously growing coats that mat quickly (4 weeks).
const SHORT_INTERVAL_BREEDS: &[&str] = &[
    "poodle",
    "doodle",
    "bichon",
    "shih tzu",
    "maltese",
    "cocker",
    "lhasa",
];

/// Double coats that mostly need seasonal maintenance (8 weeks).
const LONG_INTERVAL_BREEDS: &[&str] = &[
    "retriever",
    "shepherd",
    "collie",
    "husky",
    "samoyed",
    "corgi",
];

/// Recommended days between grooms for a breed.
pub fn recommended_interval_days(breed: Option<&str>) -> i64 {
    let Some(breed) = breed else {
        return DEFAULT_INTERVAL_DAYS;
    };
    let breed = breed.to_lowercase();
    if SHORT_INTERVAL_BREEDS.iter().any(|b| breed.contains(b)) {
        28
    } else if LONG_INTERVAL_BREEDS.iter().any(|b| breed.contains(b)) {
        56
    } else {
        DEFAULT_INTERVAL_DAYS
    }
}

/// Whether a customer is due for a groom reminder at `now`.
///
/// A customer is due when they opted in, have a recorded last groom, and the
/// breed interval has elapsed since then. Customers with no groom history are
/// never swept; there is nothing to anchor the cadence to.
pub fn due_for_reminder(customer: &Customer, now: DateTime<Utc>) -> bool {
    if !customer.reminders_opt_in {
        return false;
    }
    let Some(last_groomed_at) = customer.last_groomed_at else {
        return false;
    };
    let interval = Duration::days(recommended_interval_days(customer.breed.as_deref()));
    last_groomed_at + interval <= now
}
