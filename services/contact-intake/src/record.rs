// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persisted submission records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An accepted contact submission. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// Acceptance instant (RFC 3339 / ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
    pub name: String,
    /// Trimmed, lower-cased
    pub email: String,
    pub message: String,
    /// Fingerprint of email + lower-cased message
    pub content_hash: String,
    /// Origin network address at submission time
    pub source_address: String,
}

impl SubmissionRecord {
    /// Build a record for an accepted submission. Inputs must already be
    /// normalized; the fingerprint is computed here.
    pub fn new(
        name: String,
        email: String,
        message: String,
        source_address: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let content_hash = content_hash(&email, &message);
        Self {
            id: Uuid::new_v4(),
            timestamp,
            name,
            email,
            message,
            content_hash,
            source_address,
        }
    }
}

/// Deterministic content fingerprint (BLAKE3-256, hex).
///
/// Message case is folded, so resubmitting with different capitalization
/// hashes identically.
pub fn content_hash(email: &str, message: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(email.as_bytes());
    hasher.update(message.to_lowercase().as_bytes());
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_ignores_message_case() {
        assert_eq!(
            content_hash("a@example.com", "Hello There"),
            content_hash("a@example.com", "hello there")
        );
    }

    #[test]
    fn test_hash_sensitive_to_content() {
        assert_ne!(
            content_hash("a@example.com", "hello there"),
            content_hash("a@example.com", "hello there!")
        );
        assert_ne!(
            content_hash("a@example.com", "hello"),
            content_hash("b@example.com", "hello")
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = SubmissionRecord::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "Hi".to_string(),
            "203.0.113.7".to_string(),
            Utc::now(),
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["contentHash"], record.content_hash);
        assert_eq!(value["sourceAddress"], "203.0.113.7");
        assert!(value["timestamp"].is_string());
        assert_eq!(record.content_hash.len(), 64);
    }

    #[test]
    fn test_ids_unique() {
        let now = Utc::now();
        let a = SubmissionRecord::new("a".into(), "a@x".into(), "m".into(), "ip".into(), now);
        let b = SubmissionRecord::new("a".into(), "a@x".into(), "m".into(), "ip".into(), now);
        assert_ne!(a.id, b.id);
    }
}
