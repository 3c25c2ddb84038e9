// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse-pattern tests for contact intake.
//!
//! Each test replays a burst of submissions inside one window and checks
//! how many get through.

mod harness;

use chrono::{Duration, Utc};
use contact_intake::{config::Config, store::InMemorySubmissionStore};
use harness::{
    fakes::RecordingNotifier,
    generators::{form_request, generate_origins},
    handler_with,
};
use std::sync::Arc;

struct Tally {
    accepted: usize,
    throttled: usize,
}

/// Submit `requests` one second apart and tally the outcomes.
async fn replay(
    requests: Vec<contact_intake::InboundRequest>,
) -> (Tally, Arc<InMemorySubmissionStore>) {
    let store = Arc::new(InMemorySubmissionStore::new());
    let (handler, _) = handler_with(
        &Config::default(),
        store.clone(),
        Arc::new(RecordingNotifier::default()),
    );
    let start = Utc::now();

    let mut tally = Tally {
        accepted: 0,
        throttled: 0,
    };
    for (i, request) in requests.iter().enumerate() {
        let at = start + Duration::seconds(i as i64);
        match handler.handle_at(request, at).await.status_code {
            200 => tally.accepted += 1,
            429 => tally.throttled += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    (tally, store)
}

#[tokio::test]
async fn test_single_origin_flood() {
    let requests = (0..50)
        .map(|i| {
            form_request(
                "203.0.113.9",
                "Bot",
                &format!("bot{}@spam.example", i),
                &format!("buy now {}", i),
            )
        })
        .collect();

    let (tally, store) = replay(requests).await;

    assert_eq!(tally.accepted, 10);
    assert_eq!(tally.throttled, 40);
    assert_eq!(store.len().await, 10);
}

#[tokio::test]
async fn test_single_email_flood_from_one_origin() {
    let requests = (0..20)
        .map(|i| {
            form_request(
                "203.0.113.10",
                "Bot",
                "same@spam.example",
                &format!("variant {}", i),
            )
        })
        .collect();

    let (tally, _) = replay(requests).await;

    assert_eq!(tally.accepted, 5);
    assert_eq!(tally.throttled, 15);
}

#[tokio::test]
async fn test_origin_rotation_bypasses_email_limit() {
    // The email cap is counted per origin, so one sender spread over many
    // addresses is not held to it.
    let requests = generate_origins(20)
        .iter()
        .enumerate()
        .map(|(i, origin)| {
            form_request(origin, "Bot", "same@spam.example", &format!("variant {}", i))
        })
        .collect();

    let (tally, _) = replay(requests).await;

    assert_eq!(tally.accepted, 20);
}

#[tokio::test]
async fn test_distributed_duplicate_spam() {
    let requests = generate_origins(30)
        .iter()
        .map(|origin| form_request(origin, "Bot", "same@spam.example", "Identical Pitch"))
        .collect();

    let (tally, store) = replay(requests).await;

    assert_eq!(tally.accepted, 1);
    assert_eq!(tally.throttled, 29);
    assert_eq!(store.len().await, 1);
}

#[test]
fn test_generated_origins_are_distinct() {
    let origins = generate_origins(600);
    let unique: std::collections::HashSet<_> = origins.iter().collect();
    assert_eq!(unique.len(), 600);
}
