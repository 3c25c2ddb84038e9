// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Normalized inbound request as supplied by the routing layer.
//!
//! The shape follows the API-gateway event convention: camelCase keys, a
//! body that is either JSON text or an already-decoded mapping, and a
//! request context carrying the peer address.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Origin recorded when no address hint is present.
pub const UNKNOWN_ORIGIN: &str = "unknown";

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Inbound request envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRequest {
    #[serde(default)]
    pub http_method: Option<String>,
    /// Header values are kept as raw JSON; only string values are read.
    #[serde(default)]
    pub headers: Option<HashMap<String, Value>>,
    /// `None` when the key is absent, `Some(Value::Null)` for an explicit null.
    #[serde(default, deserialize_with = "present")]
    pub body: Option<Value>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

/// Request metadata attached by the routing layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// HTTP API (v2) context
    #[serde(default)]
    pub http: Option<HttpContext>,
    /// REST API (v1) identity
    #[serde(default)]
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpContext {
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

/// Raw, untrusted form fields. An absent key is `None`; a present key must
/// hold a string, `null` included.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "string_field")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "string_field")]
    pub message: Option<String>,
}

/// Form fields after trimming and email lower-casing, all non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl InboundRequest {
    /// Build a request carrying a JSON text body.
    pub fn with_text_body(body: impl Into<String>) -> Self {
        Self {
            http_method: Some("POST".to_string()),
            body: Some(Value::String(body.into())),
            ..Default::default()
        }
    }

    /// Set the HTTP-context source address.
    pub fn with_source_ip(mut self, addr: impl Into<String>) -> Self {
        let context = self.request_context.get_or_insert_with(Default::default);
        context
            .http
            .get_or_insert_with(Default::default)
            .source_ip = Some(addr.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), Value::String(value.into()));
        self
    }

    /// Case-insensitive header lookup. Non-string values read as absent.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.as_ref()?.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    }

    /// Derive the origin address.
    ///
    /// Tried in order: HTTP-context source address, identity source
    /// address, first entry of `x-forwarded-for`. Falls back to
    /// [`UNKNOWN_ORIGIN`].
    pub fn origin_address(&self) -> String {
        let context = self.request_context.as_ref();

        let from_http = context
            .and_then(|c| c.http.as_ref())
            .and_then(|h| h.source_ip.as_deref());
        let from_identity = context
            .and_then(|c| c.identity.as_ref())
            .and_then(|i| i.source_ip.as_deref());
        let from_forwarded = self
            .header_value(FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim);

        [from_http, from_identity, from_forwarded]
            .into_iter()
            .flatten()
            .find(|ip| !ip.is_empty())
            .unwrap_or(UNKNOWN_ORIGIN)
            .to_string()
    }

    /// Decode the form from the body.
    ///
    /// A missing body is an empty form. A string body must be JSON text
    /// encoding an object; a null body, any other shape, or a field that is
    /// not a string is an error.
    pub fn parse_form(&self) -> Result<ContactForm, serde_json::Error> {
        match &self.body {
            None => Ok(ContactForm::default()),
            Some(Value::String(text)) => serde_json::from_str(text),
            Some(value) => ContactForm::deserialize(value),
        }
    }
}

impl ContactForm {
    /// Trim every field and lower-case the email. `None` if any field is
    /// missing or blank.
    pub fn normalize(&self) -> Option<Submission> {
        let name = non_blank(self.name.as_deref())?.to_string();
        let email = non_blank(self.email.as_deref())?.to_lowercase();
        let message = non_blank(self.message.as_deref())?.to_string();
        Some(Submission {
            name,
            email,
            message,
        })
    }
}

fn non_blank(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn string_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(Some)
}
