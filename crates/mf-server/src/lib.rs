//! mf-server: HTTP front end for the video-to-MP3 converter.
//!
//! This crate ties mf-core and mf-av together into a running server:
//!
//! - Axum router with the `/convert` upload endpoint and a landing page
//! - Request-id tracing spans and HTTP request logging
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use mf_core::config::Config;

use crate::context::AppContext;

/// Start the mp3forge server.
///
/// Discovers external tools, builds the router and serves until SIGINT or
/// SIGTERM is received.
pub async fn start(config: Config) -> mf_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let ctx = AppContext::new(config.clone());
    for info in ctx.tool_status().await? {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!("Tool not found: {}; conversions will fail", info.name);
        }
    }

    tracing::info!(
        "Scratch files go to {}",
        config.server.scratch_root().display()
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| mf_core::Error::Validation(format!("Invalid server address: {e}")))?;

    let app = router::build_router(ctx, config.server.static_dir.clone());

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        mf_core::Error::Internal(format!("Failed to bind to {addr}: {e}"))
    })?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
