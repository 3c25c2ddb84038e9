// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Operator notification for accepted submissions.
//!
//! Delivery is best-effort. The handler logs and discards any
//! [`NotifyError`]; nothing here is retried.

use crate::config::NotifyConfig;
use crate::error::NotifyError;
use crate::record::SubmissionRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// A plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

impl Notification {
    /// Summarize a submission for the operator, who is both sender and
    /// recipient.
    pub fn for_submission(config: &NotifyConfig, record: &SubmissionRecord) -> Self {
        Self {
            from: config.operator_email.clone(),
            to: vec![config.operator_email.clone()],
            subject: format!("{}: {}", config.subject_prefix, record.name),
            text: format!(
                "You have a new message from your portfolio:\n\n\
                 Name: {}\n\
                 Email: {}\n\
                 Message: {}",
                record.name, record.email, record.message
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Posts notifications as JSON to a mail relay.
///
/// Any non-2xx reply (quota exhaustion included) is a failure.
pub struct HttpNotifier {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = %self.endpoint, subject = %notification.subject, "Notification relayed");
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// Logs notifications instead of delivering them.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            to = ?notification.to,
            subject = %notification.subject,
            "No mail relay configured, notification logged only"
        );
        Ok(())
    }
}
