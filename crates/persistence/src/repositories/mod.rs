//! Repository implementations.

pub mod booking;
pub mod connection;
pub mod customer;
pub mod notification_attempt;
pub mod quota;
pub mod retry_queue;
pub mod settings;
pub mod tracking;

pub use booking::BookingRepository;
pub use connection::ProviderConnectionRepository;
pub use customer::CustomerRepository;
pub use notification_attempt::NotificationAttemptRepository;
pub use quota::QuotaCounterRepository;
pub use retry_queue::{RetryFailureOutcome, RetryQueueRepository};
pub use settings::SettingsRepository;
pub use tracking::TrackingLinkRepository;
