// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission storage.
//!
//! The handler only needs two windowed reads and one insert. Reads return
//! records whose timestamp is strictly after `since`. Reads and the insert
//! are independent operations; nothing makes a check-then-insert sequence
//! atomic across concurrent requests.

use crate::error::StoreError;
use crate::record::SubmissionRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Records from `origin` newer than `since`.
    async fn recent_by_origin(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>>;

    /// Records with `content_hash` newer than `since`.
    async fn recent_by_content_hash(
        &self,
        content_hash: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>>;

    /// Persist a new record.
    async fn insert(&self, record: SubmissionRecord) -> StoreResult<()>;
}

/// In-memory store.
pub struct InMemorySubmissionStore {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Start from existing records.
    pub fn with_records(records: Vec<SubmissionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Snapshot of every stored record.
    pub async fn all(&self) -> Vec<SubmissionRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn select<P>(&self, since: DateTime<Utc>, predicate: P) -> Vec<SubmissionRecord>
    where
        P: Fn(&SubmissionRecord) -> bool,
    {
        let records = self.records.read().await;
        records
            .iter()
            .filter(|r| r.timestamp > since && predicate(r))
            .cloned()
            .collect()
    }
}

impl Default for InMemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn recent_by_origin(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        Ok(self.select(since, |r| r.source_address == origin).await)
    }

    async fn recent_by_content_hash(
        &self,
        content_hash: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        Ok(self.select(since, |r| r.content_hash == content_hash).await)
    }

    async fn insert(&self, record: SubmissionRecord) -> StoreResult<()> {
        let mut records = self.records.write().await;
        records.push(record);
        Ok(())
    }
}

/// Append-only JSON-lines file store.
///
/// Every record is one line. The file is replayed into memory on open and
/// queries are served from memory; inserts append to the file before the
/// in-memory index is updated.
pub struct JsonlSubmissionStore {
    path: PathBuf,
    index: InMemorySubmissionStore,
    writer: Mutex<()>,
}

impl JsonlSubmissionStore {
    /// Open (or create) the store at `path`.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let records = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(serde_json::from_str)
                .collect::<Result<Vec<SubmissionRecord>, _>>()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), records = records.len(), "Opened submission store");

        Ok(Self {
            path,
            index: InMemorySubmissionStore::with_records(records),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubmissionStore for JsonlSubmissionStore {
    async fn recent_by_origin(
        &self,
        origin: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        self.index.recent_by_origin(origin, since).await
    }

    async fn recent_by_content_hash(
        &self,
        content_hash: &str,
        since: DateTime<Utc>,
    ) -> StoreResult<Vec<SubmissionRecord>> {
        self.index.recent_by_content_hash(content_hash, since).await
    }

    async fn insert(&self, record: SubmissionRecord) -> StoreResult<()> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        // Serialize appends so lines never interleave.
        let _guard = self.writer.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(id = %record.id, path = %self.path.display(), "Appended submission");
        self.index.insert(record).await
    }
}

/// Open the store named by `path`: `memory` or a JSON-lines file.
pub async fn open_store(path: &str) -> StoreResult<Arc<dyn SubmissionStore>> {
    if path == "memory" {
        Ok(Arc::new(InMemorySubmissionStore::new()))
    } else {
        Ok(Arc::new(JsonlSubmissionStore::open(path).await?))
    }
}
