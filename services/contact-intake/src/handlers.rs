// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact intake service.
//!
//! Two ways in: browsers POST the form straight to `/contact`, or a
//! routing layer POSTs a normalized event to `/invoke` and receives the
//! response envelope back as JSON.

use crate::config::Config;
use crate::error::SubmissionError;
use crate::metrics::Metrics;
use crate::request::{HttpContext, InboundRequest, RequestContext};
use crate::response::{preflight_headers, HandlerResponse};
use crate::submission::SubmissionHandler;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub handler: SubmissionHandler,
    pub metrics: Option<Metrics>,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", post(submit).options(preflight))
        .route("/invoke", post(invoke));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    app.with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Direct form submission.
///
/// The peer address, when known, fills the HTTP-context source address;
/// otherwise origin falls back to `X-Forwarded-For`. A body that is not
/// UTF-8 is malformed input and nothing is stored.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let text = match String::from_utf8(body.to_vec()) {
        Ok(text) => text,
        Err(err) => return state.handler.reject(&SubmissionError::from(err)).into_response(),
    };

    let request = InboundRequest {
        http_method: Some("POST".to_string()),
        headers: Some(header_map(&headers)),
        body: Some(Value::String(text)),
        request_context: Some(RequestContext {
            http: Some(HttpContext {
                source_ip: connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()),
                method: Some("POST".to_string()),
            }),
            identity: None,
        }),
    };

    debug!(origin = %request.origin_address(), "Processing contact form");

    state.handler.handle(&request).await.into_response()
}

/// CORS preflight for `/contact`.
pub async fn preflight() -> Response {
    let mut headers = preflight_headers();
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    HandlerResponse {
        status_code: StatusCode::NO_CONTENT.as_u16(),
        headers,
        body: String::new(),
    }
    .into_response()
}

/// Normalized event in, response envelope out.
///
/// The reply is always an envelope. An event that cannot be decoded gets
/// the same 500 envelope as any other malformed input.
pub async fn invoke(State(state): State<Arc<AppState>>, body: Bytes) -> Json<HandlerResponse> {
    match serde_json::from_slice::<InboundRequest>(&body) {
        Ok(request) => Json(state.handler.handle(&request).await),
        Err(err) => Json(state.handler.reject(&SubmissionError::MalformedBody(err))),
    }
}

/// Prometheus exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let Some(metrics) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match metrics.render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn header_map(headers: &HeaderMap) -> HashMap<String, Value> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), Value::String(v.to_string())))
        })
        .collect()
}
