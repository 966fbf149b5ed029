//! TMDB Proxy - A caching reverse proxy for the movie-database API
//!
//! Forwards any request to the upstream API, adds CORS headers, and caches
//! 200 responses in memory with TTL expiration and a size bound.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tmdb_proxy::{api::create_router, cache::KeyPolicy, spawn_sweep_task, AppState, Config};

/// Main entry point for the proxy server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store and upstream client
/// 4. Start background sweep task
/// 5. Create Axum router with the catch-all proxy route
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tmdb_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TMDB proxy");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: upstream={}, key_policy={}, cache_ttl={}s, max_entries={:?}, timeout={}s, port={}",
        config.upstream_base_url,
        config.key_policy,
        config.cache_ttl,
        config.max_entries,
        config.upstream_timeout,
        config.server_port
    );
    if config.key_policy == KeyPolicy::PathOnly {
        warn!("Cache keys ignore Authorization: responses are shared across credentials");
    }

    let state = AppState::from_config(&config).context("Failed to initialize proxy state")?;
    info!("Cache store initialized");

    let shutdown = CancellationToken::new();
    let sweep_handle =
        spawn_sweep_task(state.cache.clone(), config.cache_ttl(), shutdown.clone());

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("Server error")?;

    // Covers exits that did not go through the signal handler
    shutdown.cancel();
    if let Err(err) = sweep_handle.await {
        warn!("Sweep task ended abnormally: {}", err);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops background tasks.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    shutdown.cancel();
    info!("Cache sweep task signalled to stop");
}
