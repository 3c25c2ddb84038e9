// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request and record generators.

use chrono::{DateTime, Utc};
use contact_intake::{record::SubmissionRecord, request::InboundRequest};
use serde_json::json;

/// A form submission arriving from `origin` with a JSON text body.
pub fn form_request(origin: &str, name: &str, email: &str, message: &str) -> InboundRequest {
    let body = json!({"name": name, "email": email, "message": message}).to_string();
    InboundRequest::with_text_body(body).with_source_ip(origin)
}

/// Generate `count` distinct IPv4 origins.
pub fn generate_origins(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("10.{}.{}.{}", (i >> 16) & 0xff, (i >> 8) & 0xff, i & 0xff))
        .collect()
}

/// `count` stored records from `origin` with `email`, each with distinct
/// content, all stamped `at`.
pub fn seed_records(
    origin: &str,
    email: &str,
    count: usize,
    at: DateTime<Utc>,
) -> Vec<SubmissionRecord> {
    (0..count)
        .map(|i| {
            SubmissionRecord::new(
                format!("Seed {}", i),
                email.to_string(),
                format!("seeded message number {}", i),
                origin.to_string(),
                at,
            )
        })
        .collect()
}

/// Like [`seed_records`] but every record has its own email.
pub fn seed_distinct_senders(
    origin: &str,
    count: usize,
    at: DateTime<Utc>,
) -> Vec<SubmissionRecord> {
    (0..count)
        .flat_map(|i| seed_records(origin, &format!("sender{}@example.org", i), 1, at))
        .collect()
}
