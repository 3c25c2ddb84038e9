// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake
//!
//! Accepts contact-form submissions, throttles abuse, stores accepted
//! messages and notifies the operator:
//!
//! - Required field validation (name, email, message)
//! - Per-origin cap (10 per hour default)
//! - Per-email cap within the origin's submissions (5 per hour default)
//! - Duplicate content blocking (5 minute window)
//! - Best-effort operator notification

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod notifier;
pub mod record;
pub mod request;
pub mod response;
pub mod store;
pub mod submission;

pub use config::Config;
pub use error::{RateLimitReason, SubmissionError};
pub use request::InboundRequest;
pub use response::HandlerResponse;
pub use submission::SubmissionHandler;
