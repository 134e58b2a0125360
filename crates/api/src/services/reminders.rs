//! Reminder sweep service.
//!
//! Externally triggered (there is no in-process scheduler): an admin
//! endpoint invokes one sweep, which dispatches a groom reminder with a
//! fresh tracking link to every customer whose breed interval has elapsed.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use domain::models::{AppSettings, Customer};
use domain::models::notification::TemplateKind;
use domain::services::reminders::due_for_reminder;
use persistence::repositories::{CustomerRepository, TrackingLinkRepository};

use crate::services::dispatch::{DispatchError, DispatchOutcome, DispatchService, NotificationRequest};
use crate::services::templates::{click_url, groom_reminder};

/// Report for one reminder sweep run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ReminderSweepReport {
    pub candidates: u32,
    pub dispatched: u32,
    pub queued_for_retry: u32,
    pub failed_permanent: u32,
    pub skipped_paused: u32,
    pub skipped_unreachable: u32,
}

/// Service running the breed-based reminder sweep.
pub struct ReminderSweepService {
    pool: PgPool,
    dispatch: Arc<DispatchService>,
    click_base_url: String,
}

impl ReminderSweepService {
    pub fn new(pool: PgPool, dispatch: Arc<DispatchService>, click_base_url: &str) -> Self {
        Self {
            pool,
            dispatch,
            click_base_url: click_base_url.to_string(),
        }
    }

    /// Run one sweep over all opted-in customers.
    pub async fn run(&self, settings: &AppSettings) -> Result<ReminderSweepReport, DispatchError> {
        let customers = CustomerRepository::new(self.pool.clone());
        let tracking = TrackingLinkRepository::new(self.pool.clone());

        let now = Utc::now();
        let mut report = ReminderSweepReport::default();

        for entity in customers.list_reminder_candidates().await? {
            let customer: Customer = entity.into();
            if !due_for_reminder(&customer, now) {
                continue;
            }
            report.candidates += 1;

            let Some((channel, recipient)) = customer.preferred_channel() else {
                report.skipped_unreachable += 1;
                continue;
            };
            let recipient = recipient.to_string();

            let link = tracking.create(customer.customer_id, channel).await?;
            let url = click_url(&self.click_base_url, link.tracking_id);
            let content = groom_reminder(&customer.name, &url);

            let request = NotificationRequest {
                customer_id: customer.customer_id,
                channel,
                recipient,
                template: TemplateKind::GroomReminder,
                content,
                tracking_id: Some(link.tracking_id),
            };

            match self.dispatch.dispatch(request, settings).await? {
                DispatchOutcome::Sent => report.dispatched += 1,
                DispatchOutcome::QueuedForRetry => report.queued_for_retry += 1,
                DispatchOutcome::FailedPermanent => report.failed_permanent += 1,
                DispatchOutcome::SkippedPaused => {
                    report.skipped_paused += 1;
                    warn!(
                        customer_id = %customer.customer_id,
                        channel = %channel,
                        "Reminder skipped, connection paused"
                    );
                }
            }
        }

        info!(
            candidates = report.candidates,
            dispatched = report.dispatched,
            skipped_paused = report.skipped_paused,
            "Reminder sweep completed"
        );

        Ok(report)
    }
}
