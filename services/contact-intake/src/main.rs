// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Receives contact-form submissions and applies, in order:
//!
//! - Required field validation
//! - 10 submissions per hour per origin address (default)
//! - 5 submissions per hour per email from that origin (default)
//! - Duplicate content blocking for 5 minutes (default)
//!
//! Accepted submissions are stored, then relayed to the operator by email.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `MAX_PER_ORIGIN`, `MAX_PER_EMAIL`: Hourly caps (default: 10, 5)
//! - `ORIGIN_WINDOW_SECS`, `DUPLICATE_WINDOW_SECS`: Windows (default: 3600, 300)
//! - `OPERATOR_EMAIL`: Notification sender and recipient
//! - `MAIL_RELAY_URL`: Mail relay endpoint (notifications are logged if unset)
//! - `STORE_PATH`: `memory` or a JSON-lines file (default: memory)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{
    config::Config,
    handlers::{router, AppState},
    metrics::Metrics,
    notifier::{HttpNotifier, LogNotifier, Notifier},
    store::open_store,
    submission::SubmissionHandler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_per_origin = config.rate_limit.max_per_origin,
        max_per_email = config.rate_limit.max_per_email,
        origin_window_secs = config.rate_limit.origin_window_secs,
        duplicate_window_secs = config.rate_limit.duplicate_window_secs,
        store = %config.store.path,
        "Starting contact intake"
    );

    let store = open_store(&config.store.path).await?;

    let notifier: Arc<dyn Notifier> = match config.notify.parsed_relay_url()? {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "Relaying notifications");
            Arc::new(HttpNotifier::new(endpoint, config.notify.relay_timeout())?)
        }
        None => Arc::new(LogNotifier),
    };

    let metrics = if config.metrics.enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let mut handler = SubmissionHandler::new(&config, store, notifier);
    if let Some(metrics) = &metrics {
        handler = handler.with_metrics(metrics.clone());
    }

    let state = Arc::new(AppState {
        handler,
        metrics,
        config: config.clone(),
    });

    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
