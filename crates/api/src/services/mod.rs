//! Application services.

pub mod dispatch;
pub mod provider;
pub mod reminders;
pub mod settings_cache;
pub mod templates;

pub use dispatch::{DispatchOutcome, DispatchService, NotificationRequest};
pub use provider::build_provider;
pub use reminders::ReminderSweepService;
pub use settings_cache::SettingsCache;
