//! Tabs HTTP server.
//!
//! Wires configuration, the `PostgreSQL` stores and the axum router together,
//! then serves until Ctrl+C or SIGTERM.

pub mod config;

pub use config::{Config, ConfigError, DEFAULT_LOG_FILTER, ServerConfig};

use anyhow::Context;
use axum::Router;
use std::future::IntoFuture;
use std::sync::Arc;
use tabs_core::TabService;
use tabs_core::environment::SystemClock;
use tabs_postgres::{PostgresTabStore, PostgresUserDirectory};
use tabs_web::{AppState, build_router};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Connect to the database, optionally migrate, and build the router.
///
/// # Errors
///
/// Fails if the database is unreachable or a migration fails.
pub async fn build_app(config: &Config) -> anyhow::Result<Router> {
    let pool = tabs_postgres::connect(&config.postgres)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("✓ PostgreSQL connected");

    let tabs = PostgresTabStore::from_pool(pool.clone());
    if config.run_migrations {
        tabs.migrate().await.context("Failed to run migrations")?;
        info!("✓ Migrations applied");
    }

    let users = PostgresUserDirectory::from_pool(pool);
    let tabs = Arc::new(tabs);
    let service = TabService::new(tabs.clone(), Arc::new(users), Arc::new(SystemClock));

    Ok(build_router(AppState::new(service, tabs)))
}

/// Serve the application until a shutdown signal arrives.
///
/// In-flight requests get `SHUTDOWN_TIMEOUT` seconds to finish once the
/// signal is received.
///
/// # Errors
///
/// Fails if start-up fails or the listener cannot be bound.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let app = build_app(&config).await?;

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(address = %address, "🚀 Tabs server listening");

    let stopping = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let stopping = Arc::clone(&stopping);
            async move {
                shutdown_signal().await;
                stopping.notify_one();
            }
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = stopping.notified() => {
            let grace = config.server.shutdown_grace();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(timeout_secs = grace.as_secs(), "Graceful shutdown timed out"),
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(error) => {
                warn!(error = %error, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(error) => {
                warn!(error = %error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
