// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fake store and notifier implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contact_intake::{
    error::{NotifyError, StoreError},
    notifier::{Notification, Notifier},
    record::SubmissionRecord,
    store::{InMemorySubmissionStore, StoreResult, SubmissionStore},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Notifier that keeps every notification it is given.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notifier whose provider always refuses, as on quota exhaustion.
#[derive(Default)]
pub struct QuotaExceededNotifier {
    attempts: AtomicUsize,
}

impl QuotaExceededNotifier {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for QuotaExceededNotifier {
    async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Rejected { status: 454 })
    }
}

/// In-memory store that counts reads and writes.
#[derive(Default)]
pub struct CountingStore {
    pub inner: InMemorySubmissionStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn with_records(records: Vec<SubmissionRecord>) -> Self {
        Self {
            inner: InMemorySubmissionStore::with_records(records),
            ..Default::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionStore for CountingStore {
    async fn recent_by_origin(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.recent_by_origin(origin, since).await
    }

    async fn recent_by_content_hash(
        &self,
        content_hash: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.recent_by_content_hash(content_hash, since).await
    }

    async fn insert(&self, record: SubmissionRecord) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(record).await
    }
}

/// Store whose every call fails.
pub struct UnavailableStore;

fn unavailable() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "store endpoint refused connection",
    ))
}

#[async_trait]
impl SubmissionStore for UnavailableStore {
    async fn recent_by_origin(
        &self,
        _origin: &str,
        _since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        Err(unavailable())
    }

    async fn recent_by_content_hash(
        &self,
        _content_hash: &str,
        _since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        Err(unavailable())
    }

    async fn insert(&self, _record: SubmissionRecord) -> StoreResult<()> {
        Err(unavailable())
    }
}
