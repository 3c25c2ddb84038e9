// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Every tunable has a default so the service starts with no environment
//! at all; `Config::from_env` overrides individual values.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Submission throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Operator notification
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Submission store
    #[serde(default)]
    pub store: StoreConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Submission throttling limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Accepted submissions per origin address per origin window (default: 10)
    #[serde(default = "default_max_per_origin")]
    pub max_per_origin: u32,

    /// Accepted submissions per email, counted within the origin's
    /// window results (default: 5)
    #[serde(default = "default_max_per_email")]
    pub max_per_email: u32,

    /// Origin window in seconds (default: 3600)
    #[serde(default = "default_origin_window_secs")]
    pub origin_window_secs: u64,

    /// Duplicate-content window in seconds (default: 300)
    #[serde(default = "default_duplicate_window_secs")]
    pub duplicate_window_secs: u64,
}

/// Operator notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Sender and recipient of notifications
    #[serde(default = "default_operator_email")]
    pub operator_email: String,

    /// Subject prefix; the submitter's name is appended
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,

    /// Mail relay endpoint. Notifications are only logged when unset.
    #[serde(default)]
    pub relay_url: Option<String>,

    /// Relay request timeout in milliseconds (default: 10000)
    #[serde(default = "default_relay_timeout_ms")]
    pub relay_timeout_ms: u64,
}

/// Submission store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory` or a path to a JSON-lines file (default: memory)
    #[serde(default = "default_store_path")]
    pub path: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid mail relay URL {url}: {reason}")]
    InvalidRelayUrl { url: String, reason: String },
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_per_origin() -> u32 {
    10
}

fn default_max_per_email() -> u32 {
    5
}

fn default_origin_window_secs() -> u64 {
    3600
}

fn default_duplicate_window_secs() -> u64 {
    300
}

fn default_operator_email() -> String {
    "contact@localhost".to_string()
}

fn default_subject_prefix() -> String {
    "New Portfolio Contact".to_string()
}

fn default_relay_timeout_ms() -> u64 {
    10000
}

fn default_store_path() -> String {
    "memory".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            notify: NotifyConfig::default(),
            store: StoreConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_origin: default_max_per_origin(),
            max_per_email: default_max_per_email(),
            origin_window_secs: default_origin_window_secs(),
            duplicate_window_secs: default_duplicate_window_secs(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            operator_email: default_operator_email(),
            subject_prefix: default_subject_prefix(),
            relay_url: None,
            relay_timeout_ms: default_relay_timeout_ms(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the origin window duration
    pub fn origin_window(&self) -> Duration {
        Duration::from_secs(self.origin_window_secs)
    }

    /// Get the duplicate-content window duration
    pub fn duplicate_window(&self) -> Duration {
        Duration::from_secs(self.duplicate_window_secs)
    }
}

impl NotifyConfig {
    /// Get the relay request timeout
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_timeout_ms)
    }

    /// Parse the relay URL, if one is configured.
    pub fn parsed_relay_url(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.relay_url.as_deref() else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidRelayUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRelayUrl {
                url: raw.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }
        Ok(Some(url))
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; set keys that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_PER_ORIGIN")? {
            config.rate_limit.max_per_origin = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_PER_EMAIL")? {
            config.rate_limit.max_per_email = v;
        }
        if let Some(v) = parse_var(&lookup, "ORIGIN_WINDOW_SECS")? {
            config.rate_limit.origin_window_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "DUPLICATE_WINDOW_SECS")? {
            config.rate_limit.duplicate_window_secs = v;
        }
        if let Some(v) = lookup("OPERATOR_EMAIL") {
            config.notify.operator_email = v;
        }
        if let Some(v) = lookup("NOTIFY_SUBJECT_PREFIX") {
            config.notify.subject_prefix = v;
        }
        if let Some(v) = lookup("MAIL_RELAY_URL").filter(|v| !v.is_empty()) {
            config.notify.relay_url = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "MAIL_RELAY_TIMEOUT_MS")? {
            config.notify.relay_timeout_ms = v;
        }
        if let Some(v) = lookup("STORE_PATH") {
            config.store.path = v;
        }
        if let Some(v) = parse_var(&lookup, "METRICS_ENABLED")? {
            config.metrics.enabled = v;
        }
        if let Some(v) = lookup("METRICS_PATH") {
            config.metrics.path = v;
        }

        if !config.metrics.path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                key: "METRICS_PATH",
                value: config.metrics.path,
            });
        }

        // Surface a bad relay URL at startup rather than on first send.
        config.notify.parsed_relay_url()?;

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
