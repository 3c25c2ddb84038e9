// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for contact intake.

use thiserror::Error;

/// Reason a submission was throttled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitReason {
    /// Origin address exceeded its hourly cap
    OriginRateExceeded,
    /// Email exceeded its hourly cap within the origin's submissions
    EmailRateExceeded,
    /// Same content seen inside the duplicate window
    DuplicateContent,
}

impl RateLimitReason {
    /// Message returned to the submitter.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::OriginRateExceeded => "Too many submissions. Please try again later.",
            Self::EmailRateExceeded => {
                "Too many submissions from this email. Please try again later."
            }
            Self::DuplicateContent => "Duplicate submission detected. Please wait a few minutes.",
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OriginRateExceeded => "origin_rate",
            Self::EmailRateExceeded => "email_rate",
            Self::DuplicateContent => "duplicate",
        }
    }
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OriginRateExceeded => write!(f, "Origin rate limit exceeded"),
            Self::EmailRateExceeded => write!(f, "Email rate limit exceeded"),
            Self::DuplicateContent => write!(f, "Duplicate content inside window"),
        }
    }
}

/// Store faults.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Notification faults. Never propagated past the handler.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Mail relay transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Mail relay rejected notification with status {status}")]
    Rejected { status: u16 },
}

/// Everything that can stop a submission from being accepted.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    RateLimited(RateLimitReason),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Request body is not valid UTF-8: {0}")]
    MalformedEncoding(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmissionError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingFields => 400,
            Self::RateLimited(_) => 429,
            Self::MalformedBody(_) | Self::MalformedEncoding(_) | Self::Store(_) => 500,
        }
    }

    /// Message safe to return to the submitter. Internal faults collapse to
    /// a generic message.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingFields => "Missing required fields",
            Self::RateLimited(reason) => reason.public_message(),
            Self::MalformedBody(_) | Self::MalformedEncoding(_) | Self::Store(_) => {
                "Internal server error"
            }
        }
    }

    /// Whether this is an internal fault rather than an expected rejection.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::RateLimited(reason) => reason.label(),
            Self::MalformedBody(_) | Self::MalformedEncoding(_) | Self::Store(_) => {
                "internal_error"
            }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SubmissionError>;
