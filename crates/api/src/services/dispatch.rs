//! Notification dispatch service.
//!
//! Owns the full outbound pipeline: pause gate, attempt bookkeeping,
//! best-effort quota recording, provider send, failure classification,
//! retry queue management, and connection failure streaks. A notification
//! failure never propagates to the user-facing flow that triggered it.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use domain::models::notification::{ErrorClass, NotificationChannel, TemplateKind};
use domain::models::{AppSettings, ProviderConnection};
use domain::services::messaging::{MessageProvider, OutboundMessage, ProviderError};
use persistence::repositories::{
    NotificationAttemptRepository, ProviderConnectionRepository, QuotaCounterRepository,
    RetryFailureOutcome, RetryQueueRepository,
};
use serde::Serialize;

use crate::middleware::metrics::{record_notification, record_terminal_failure};
use crate::services::templates::MessageContent;

/// Errors that can occur during dispatch bookkeeping.
///
/// Provider failures are not errors here; they are outcomes.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// What happened to a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The provider accepted the message.
    Sent,
    /// Transient failure; the attempt entered the retry queue.
    QueuedForRetry,
    /// Permanent failure; the attempt is terminally failed.
    FailedPermanent,
    /// The channel's connection is paused; no attempt was created.
    SkippedPaused,
}

/// A request to send one notification.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub customer_id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: String,
    pub template: TemplateKind,
    pub content: MessageContent,
    pub tracking_id: Option<Uuid>,
}

/// Report for a retry sweep run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrySweepReport {
    pub processed: u32,
    pub succeeded: u32,
    pub rescheduled: u32,
    pub exhausted: u32,
    pub failed_permanent: u32,
    pub skipped_paused: u32,
}

/// Service for dispatching notifications and processing retries.
pub struct DispatchService {
    pool: PgPool,
    provider: Arc<dyn MessageProvider>,
}

impl DispatchService {
    pub fn new(pool: PgPool, provider: Arc<dyn MessageProvider>) -> Self {
        Self { pool, provider }
    }

    /// Dispatch one notification.
    ///
    /// Database trouble surfaces as an error; provider failures are
    /// classified and absorbed into the outcome.
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
        settings: &AppSettings,
    ) -> Result<DispatchOutcome, DispatchError> {
        let connections = ProviderConnectionRepository::new(self.pool.clone());

        if let Some(connection) = connections.find_by_channel(request.channel).await? {
            let connection: ProviderConnection = connection.into();
            if !connection.is_active() {
                debug!(
                    channel = %request.channel,
                    "Connection paused, skipping dispatch"
                );
                return Ok(DispatchOutcome::SkippedPaused);
            }
        }

        let attempts = NotificationAttemptRepository::new(self.pool.clone());
        let attempt = attempts
            .create(
                request.customer_id,
                request.channel,
                &request.recipient,
                request.template,
                &request.content.to_payload(),
                request.tracking_id,
            )
            .await?;

        self.record_quota().await;

        let message = OutboundMessage {
            channel: request.channel,
            recipient: request.recipient.clone(),
            template: request.template,
            subject: request.content.subject.clone(),
            body: request.content.body.clone(),
            tracking_id: request.tracking_id,
        };

        match self.provider.send(&message).await {
            Ok(_receipt) => {
                attempts.mark_sent(attempt.attempt_id).await?;
                if let Err(e) = connections.reset_consecutive_failures(request.channel).await {
                    warn!(channel = %request.channel, error = %e, "Failed to reset failure streak");
                }
                record_notification(request.channel.as_str(), "sent");
                info!(
                    attempt_id = %attempt.attempt_id,
                    channel = %request.channel,
                    template = %request.template,
                    "Notification sent"
                );
                Ok(DispatchOutcome::Sent)
            }
            Err(err) => {
                self.note_connection_failure(&connections, request.channel, settings)
                    .await;
                self.absorb_send_failure(&attempts, attempt.attempt_id, request.channel, &err)
                    .await
            }
        }
    }

    /// Process a batch of due retry queue entries.
    pub async fn process_due_retries(
        &self,
        batch_size: i64,
        settings: &AppSettings,
    ) -> Result<RetrySweepReport, DispatchError> {
        let retries = RetryQueueRepository::new(self.pool.clone());
        let attempts = NotificationAttemptRepository::new(self.pool.clone());
        let connections = ProviderConnectionRepository::new(self.pool.clone());

        let due = retries.find_due(Utc::now(), batch_size).await?;
        let mut report = RetrySweepReport::default();

        for entry in due {
            report.processed += 1;

            let Some(attempt) = attempts.find_by_attempt_id(entry.attempt_id).await? else {
                warn!(attempt_id = %entry.attempt_id, "Queue entry without attempt, dropping");
                retries.remove(entry.attempt_id).await?;
                continue;
            };

            if let Some(connection) = connections.find_by_channel(attempt.channel).await? {
                let connection: ProviderConnection = connection.into();
                if !connection.is_active() {
                    // Entry stays queued; it becomes due again once an
                    // admin resumes the connection.
                    report.skipped_paused += 1;
                    continue;
                }
            }

            let Some(content) = MessageContent::from_payload(&attempt.payload) else {
                error!(attempt_id = %attempt.attempt_id, "Unreadable attempt payload, failing");
                retries.remove(entry.attempt_id).await?;
                attempts
                    .mark_failed(attempt.attempt_id, "unreadable payload")
                    .await?;
                record_terminal_failure(attempt.channel.as_str());
                continue;
            };

            self.record_quota().await;

            let message = OutboundMessage {
                channel: attempt.channel,
                recipient: attempt.recipient.clone(),
                template: attempt.template,
                subject: content.subject.clone(),
                body: content.body.clone(),
                tracking_id: attempt.tracking_id,
            };

            match self.provider.send(&message).await {
                Ok(_receipt) => {
                    retries.record_success(entry.attempt_id).await?;
                    attempts.mark_sent(entry.attempt_id).await?;
                    if let Err(e) = connections.reset_consecutive_failures(attempt.channel).await {
                        warn!(channel = %attempt.channel, error = %e, "Failed to reset failure streak");
                    }
                    record_notification(attempt.channel.as_str(), "retry_sent");
                    info!(
                        attempt_id = %entry.attempt_id,
                        retry_count = entry.retry_count,
                        "Retry succeeded"
                    );
                    report.succeeded += 1;
                }
                Err(err) => {
                    self.note_connection_failure(&connections, attempt.channel, settings)
                        .await;

                    match err.class() {
                        ErrorClass::Permanent => {
                            retries.remove(entry.attempt_id).await?;
                            attempts
                                .mark_failed(entry.attempt_id, &err.to_string())
                                .await?;
                            record_terminal_failure(attempt.channel.as_str());
                            warn!(
                                attempt_id = %entry.attempt_id,
                                error = %err,
                                "Retry failed permanently"
                            );
                            report.failed_permanent += 1;
                        }
                        ErrorClass::Transient => {
                            match retries
                                .record_failure(entry.attempt_id, &err.to_string())
                                .await?
                            {
                                RetryFailureOutcome::Rescheduled(updated) => {
                                    attempts
                                        .mark_awaiting_retry(entry.attempt_id, &err.to_string())
                                        .await?;
                                    debug!(
                                        attempt_id = %entry.attempt_id,
                                        retry_count = updated.retry_count,
                                        next_retry_at = %updated.next_retry_at,
                                        "Retry rescheduled"
                                    );
                                    report.rescheduled += 1;
                                }
                                RetryFailureOutcome::Exhausted => {
                                    attempts
                                        .mark_failed(entry.attempt_id, &err.to_string())
                                        .await?;
                                    record_terminal_failure(attempt.channel.as_str());
                                    error!(
                                        attempt_id = %entry.attempt_id,
                                        error = %err,
                                        "Retries exhausted, notification failed"
                                    );
                                    report.exhausted += 1;
                                }
                                RetryFailureOutcome::NotQueued => {
                                    warn!(
                                        attempt_id = %entry.attempt_id,
                                        "Queue entry vanished mid-retry"
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        if report.processed > 0 {
            info!(
                processed = report.processed,
                succeeded = report.succeeded,
                exhausted = report.exhausted,
                "Processed retry sweep"
            );
        }

        Ok(report)
    }

    /// Handle a delivery receipt from the provider webhook.
    pub async fn record_webhook_delivered(&self, attempt_id: Uuid) -> Result<(), DispatchError> {
        let retries = RetryQueueRepository::new(self.pool.clone());
        let attempts = NotificationAttemptRepository::new(self.pool.clone());

        retries.remove(attempt_id).await?;
        attempts.mark_sent(attempt_id).await?;
        Ok(())
    }

    /// Handle an asynchronous failure report from the provider webhook.
    ///
    /// Classified the same way as synchronous send failures: permanent
    /// reports terminate the attempt, transient reports (re)enter the retry
    /// queue.
    pub async fn record_webhook_failure(
        &self,
        attempt_id: Uuid,
        status_code: Option<u16>,
        reason: &str,
        settings: &AppSettings,
    ) -> Result<(), DispatchError> {
        let retries = RetryQueueRepository::new(self.pool.clone());
        let attempts = NotificationAttemptRepository::new(self.pool.clone());
        let connections = ProviderConnectionRepository::new(self.pool.clone());

        let Some(attempt) = attempts.find_by_attempt_id(attempt_id).await? else {
            warn!(attempt_id = %attempt_id, "Failure report for unknown attempt");
            return Ok(());
        };

        self.note_connection_failure(&connections, attempt.channel, settings)
            .await;

        let class = status_code
            .map(ErrorClass::from_status)
            .unwrap_or(ErrorClass::Transient);

        match class {
            ErrorClass::Permanent => {
                retries.remove(attempt_id).await?;
                attempts.mark_failed(attempt_id, reason).await?;
                record_terminal_failure(attempt.channel.as_str());
                warn!(attempt_id = %attempt_id, reason = reason, "Delivery failed permanently");
            }
            ErrorClass::Transient => {
                match retries.record_failure(attempt_id, reason).await? {
                    RetryFailureOutcome::Rescheduled(_) => {
                        attempts.mark_awaiting_retry(attempt_id, reason).await?;
                    }
                    RetryFailureOutcome::Exhausted => {
                        attempts.mark_failed(attempt_id, reason).await?;
                        record_terminal_failure(attempt.channel.as_str());
                        error!(
                            attempt_id = %attempt_id,
                            reason = reason,
                            "Retries exhausted, notification failed"
                        );
                    }
                    RetryFailureOutcome::NotQueued => {
                        retries.enqueue(attempt_id, reason).await?;
                        attempts.mark_awaiting_retry(attempt_id, reason).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Best-effort quota recording. Never surfaces an error to the send
    /// path; a failed counter write is logged and forgotten.
    async fn record_quota(&self) {
        let quota = QuotaCounterRepository::new(self.pool.clone());
        if let Err(e) = quota.record_call(Utc::now()).await {
            warn!(error = %e, "Failed to record provider quota call");
        }
    }

    /// Track a failure streak and pause the connection at the threshold.
    async fn note_connection_failure(
        &self,
        connections: &ProviderConnectionRepository,
        channel: NotificationChannel,
        settings: &AppSettings,
    ) {
        match connections.increment_consecutive_failures(channel).await {
            Ok(failure_count) => {
                if ProviderConnection::should_pause(failure_count, settings.pause_threshold) {
                    match connections.pause(channel).await {
                        Ok(Some(_)) => {
                            warn!(
                                channel = %channel,
                                failure_count = failure_count,
                                "Connection paused after consecutive failures"
                            );
                        }
                        Ok(None) => {
                            // Already paused by a concurrent request.
                        }
                        Err(e) => {
                            error!(channel = %channel, error = %e, "Failed to pause connection");
                        }
                    }
                }
            }
            Err(e) => {
                warn!(channel = %channel, error = %e, "Failed to record connection failure");
            }
        }
    }

    /// Classify a synchronous send failure and update attempt/queue state.
    async fn absorb_send_failure(
        &self,
        attempts: &NotificationAttemptRepository,
        attempt_id: Uuid,
        channel: NotificationChannel,
        err: &ProviderError,
    ) -> Result<DispatchOutcome, DispatchError> {
        match err.class() {
            ErrorClass::Permanent => {
                attempts.mark_failed(attempt_id, &err.to_string()).await?;
                record_terminal_failure(channel.as_str());
                warn!(
                    attempt_id = %attempt_id,
                    error = %err,
                    "Notification failed permanently, not retrying"
                );
                Ok(DispatchOutcome::FailedPermanent)
            }
            ErrorClass::Transient => {
                let retries = RetryQueueRepository::new(self.pool.clone());
                let entry = retries.enqueue(attempt_id, &err.to_string()).await?;
                attempts
                    .mark_awaiting_retry(attempt_id, &err.to_string())
                    .await?;
                record_notification(channel.as_str(), "queued_for_retry");
                info!(
                    attempt_id = %attempt_id,
                    next_retry_at = %entry.next_retry_at,
                    error = %err,
                    "Notification queued for retry"
                );
                Ok(DispatchOutcome::QueuedForRetry)
            }
        }
    }
}
