// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Newsletter Gate Service
//!
//! Serves `POST /api/newsletter` for the website's sign-up form, plus the
//! static blog lookup, health and metrics endpoints.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (or a `.env` file):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `NEWSLETTER_MAX_REQUESTS`: Submissions per window per IP (default: 5)
//! - `NEWSLETTER_WINDOW_MS`: Window length in milliseconds (default: 60000)
//! - `CLEANUP_INTERVAL_SECS`: Idle entry sweep interval (default: 300)
//! - `PROVIDER_WEBHOOK_URL`: Optional email/CRM webhook for new subscribers
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsletter_gate::{config::Config, handlers::router, AppState, CleanupTask};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        max_requests = config.rate_limit.max_requests,
        window_ms = config.rate_limit.window_ms,
        provider = config.provider.webhook_url.is_some(),
        "Starting newsletter gate"
    );

    // Create application state
    let state = Arc::new(AppState::new(config.clone())?);

    let cleanup = CleanupTask::spawn(
        state.limiter.clone(),
        config.rate_limit.cleanup_interval(),
    );

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.stop().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
