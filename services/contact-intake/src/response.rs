// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Response envelope returned to the routing layer.

use crate::error::SubmissionError;
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const MESSAGE_SENT: &str = "Message sent!";
pub const MESSAGE_RECEIVED: &str = "Message received!";

/// JSON body carried inside the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub status: String,
    pub message: String,
}

/// `{statusCode, headers, body}` envelope. `body` is JSON text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl HandlerResponse {
    /// Accepted submission. `notified` selects the sent/received wording.
    pub fn success(notified: bool) -> Self {
        let message = if notified {
            MESSAGE_SENT
        } else {
            MESSAGE_RECEIVED
        };
        let mut headers = base_headers();
        headers.extend(preflight_headers());
        Self::build(200, headers, "success", message)
    }

    /// Rejection or internal fault.
    pub fn error(err: &SubmissionError) -> Self {
        Self::build(
            err.status_code(),
            base_headers(),
            "error",
            err.public_message(),
        )
    }

    fn build(status_code: u16, headers: BTreeMap<String, String>, status: &str, message: &str) -> Self {
        let body = ResponseBody {
            status: status.to_string(),
            message: message.to_string(),
        };
        // Two plain strings always serialize.
        let body = serde_json::to_string(&body).unwrap_or_default();
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// Decode the JSON body.
    pub fn parsed_body(&self) -> Result<ResponseBody, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

fn base_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
    ])
}

/// CORS headers advertised on success and on preflight.
pub fn preflight_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "Access-Control-Allow-Methods".to_string(),
            "POST, OPTIONS".to_string(),
        ),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        ),
    ])
}

/// Render the envelope as a real HTTP response.
impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Dropping unrepresentable response header"),
            }
        }
        response
    }
}
