//! # Wanderlust Binary
//!
//! The entry point that assembles the application based on compile-time features.

mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::Request;
use axum::ServiceExt;
use wl_api::AppState;
use wl_config::Settings;
use wl_core::traits::ListingRepo;

#[cfg(not(any(feature = "db-sqlite", feature = "store-memory")))]
compile_error!("enable a storage backend: `db-sqlite` or `store-memory`");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    telemetry::init_logging(&settings.log);
    tracing::debug!(?settings, "settings loaded");

    // 1. Initialize Storage Implementation
    let repo = open_store(&settings).await?;

    // 2. Wrap in AppState (the one storage handle every request shares)
    let state = AppState::new(repo);
    let app = wl_api::app(state, &settings.server.public_dir);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Wanderlust starting on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(feature = "db-sqlite")]
async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn ListingRepo>> {
    use secrecy::ExposeSecret;

    let repo = wl_db_sqlite::SqliteListingRepo::connect(
        settings.database.url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("Failed to init SQLite")?;
    Ok(Arc::new(repo))
}

#[cfg(all(feature = "store-memory", not(feature = "db-sqlite")))]
async fn open_store(_settings: &Settings) -> anyhow::Result<Arc<dyn ListingRepo>> {
    tracing::warn!("using the in-memory store; nothing is kept after exit");
    Ok(Arc::new(wl_store_memory::MemoryListingRepo::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
