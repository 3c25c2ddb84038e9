// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission handling.
//!
//! Each call runs a fixed gate sequence: parse, validate, origin limit,
//! email limit, duplicate check, persist, notify, respond. A failed gate
//! returns immediately and nothing after it runs.
//!
//! The email limit counts records from the origin query result, so it is
//! scoped to the origin address. A sender rotating addresses is only
//! held back by the duplicate check.
//!
//! Reads and the insert are separate store calls. Two concurrent requests
//! from one origin can both pass the limit checks before either record is
//! written.

use crate::config::{Config, NotifyConfig, RateLimitConfig};
use crate::error::{RateLimitReason, Result, SubmissionError};
use crate::metrics::Metrics;
use crate::notifier::{Notification, Notifier};
use crate::record::{content_hash, SubmissionRecord};
use crate::request::InboundRequest;
use crate::response::HandlerResponse;
use crate::store::SubmissionStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of an accepted submission.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub record: SubmissionRecord,
    /// Whether the operator notification went out
    pub notified: bool,
}

pub struct SubmissionHandler {
    store: Arc<dyn SubmissionStore>,
    notifier: Arc<dyn Notifier>,
    limits: RateLimitConfig,
    notify: NotifyConfig,
    metrics: Option<Metrics>,
}

impl SubmissionHandler {
    pub fn new(
        config: &Config,
        store: Arc<dyn SubmissionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            notifier,
            limits: config.rate_limit.clone(),
            notify: config.notify.clone(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Handle one request. Never fails: every fault becomes a response.
    pub async fn handle(&self, request: &InboundRequest) -> HandlerResponse {
        self.handle_at(request, Utc::now()).await
    }

    /// Handle one request with rate windows measured back from `now`.
    pub async fn handle_at(&self, request: &InboundRequest, now: DateTime<Utc>) -> HandlerResponse {
        match self.process(request, now).await {
            Ok(accepted) => {
                info!(
                    id = %accepted.record.id,
                    origin = %accepted.record.source_address,
                    notified = accepted.notified,
                    "Submission accepted"
                );
                self.record_outcome("accepted");
                HandlerResponse::success(accepted.notified)
            }
            Err(err) => self.reject(&err),
        }
    }

    /// Log and count a failed submission, and build its response.
    ///
    /// Also used by the HTTP layer for requests that cannot be decoded
    /// into an [`InboundRequest`] at all.
    pub fn reject(&self, err: &SubmissionError) -> HandlerResponse {
        if err.is_internal() {
            error!(error = %err, "Submission failed");
        } else {
            info!(reason = err.label(), "Submission rejected");
        }
        self.record_outcome(err.label());
        HandlerResponse::error(err)
    }

    /// Run the gate sequence and return the accepted record.
    pub async fn process(&self, request: &InboundRequest, now: DateTime<Utc>) -> Result<Accepted> {
        let form = request.parse_form()?;
        let origin = request.origin_address();

        let submission = form.normalize().ok_or(SubmissionError::MissingFields)?;

        debug!(origin = %origin, email = %submission.email, "Checking submission limits");

        let origin_since = window_start(now, self.limits.origin_window());
        let from_origin = self.store.recent_by_origin(&origin, origin_since).await?;

        if from_origin.len() >= self.limits.max_per_origin as usize {
            debug!(origin = %origin, count = from_origin.len(), "Origin rate limit reached");
            return Err(SubmissionError::RateLimited(
                RateLimitReason::OriginRateExceeded,
            ));
        }

        let from_email = from_origin
            .iter()
            .filter(|r| r.email.to_lowercase() == submission.email)
            .count();
        if from_email >= self.limits.max_per_email as usize {
            debug!(origin = %origin, count = from_email, "Email rate limit reached");
            return Err(SubmissionError::RateLimited(
                RateLimitReason::EmailRateExceeded,
            ));
        }

        let hash = content_hash(&submission.email, &submission.message);
        let duplicate_since = window_start(now, self.limits.duplicate_window());
        let duplicates = self
            .store
            .recent_by_content_hash(&hash, duplicate_since)
            .await?;
        if !duplicates.is_empty() {
            debug!(origin = %origin, content_hash = %hash, "Duplicate content");
            return Err(SubmissionError::RateLimited(
                RateLimitReason::DuplicateContent,
            ));
        }

        let record = SubmissionRecord::new(
            submission.name,
            submission.email,
            submission.message,
            origin,
            now,
        );
        self.store.insert(record.clone()).await?;

        // Accepted from here on; notification cannot change that.
        let notified = self.notify_operator(&record).await;

        Ok(Accepted { record, notified })
    }

    async fn notify_operator(&self, record: &SubmissionRecord) -> bool {
        let notification = Notification::for_submission(&self.notify, record);
        match self.notifier.send(&notification).await {
            Ok(()) => true,
            Err(err) => {
                warn!(id = %record.id, error = %err, "Notification failed, submission kept");
                if let Some(metrics) = &self.metrics {
                    metrics.record_notification_failure();
                }
                false
            }
        }
    }

    fn record_outcome(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(outcome);
        }
    }
}

/// Lower bound of a trailing window, clamped at the earliest representable
/// instant.
fn window_start(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| now.checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
