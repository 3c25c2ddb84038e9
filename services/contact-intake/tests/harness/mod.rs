// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for contact intake.
//!
//! Fake collaborators plus generators for requests and seeded records.

#![allow(dead_code)]

pub mod fakes;
pub mod generators;

use contact_intake::{
    config::Config, metrics::Metrics, notifier::Notifier, store::SubmissionStore,
    submission::SubmissionHandler,
};
use std::sync::Arc;

/// Handler over the given collaborators with metrics attached.
pub fn handler_with(
    config: &Config,
    store: Arc<dyn SubmissionStore>,
    notifier: Arc<dyn Notifier>,
) -> (SubmissionHandler, Metrics) {
    let metrics = Metrics::new().unwrap();
    let handler = SubmissionHandler::new(config, store, notifier).with_metrics(metrics.clone());
    (handler, metrics)
}
