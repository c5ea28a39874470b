//! API Key Admin - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Build the record store (PostgreSQL pool + migrations, or in-memory)
//! 3. Build HTTP router with routes and middleware
//! 4. Serve on the configured port until Ctrl+C / SIGTERM
//! 5. Close the database pool

use std::sync::Arc;

use api_key_admin::{
    config::{Config, StoreBackend},
    db, routes,
    shutdown::shutdown_signal,
    state::AppState,
    store::{ApiKeyStore, MemoryApiKeyStore, PgApiKeyStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(backend = ?config.store_backend, "Configuration loaded");

    // The pool outlives the server so it can be closed after shutdown
    let (store, pool): (Arc<dyn ApiKeyStore>, Option<db::DbPool>) = match config.store_backend {
        StoreBackend::Postgres => {
            let pool =
                db::create_pool(config.database_url()?, config.database_max_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            let store: Arc<dyn ApiKeyStore> = Arc::new(PgApiKeyStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; records are lost on restart");
            let store: Arc<dyn ApiKeyStore> = Arc::new(MemoryApiKeyStore::new());
            (store, None)
        }
    };

    let app = routes::router(AppState::new(store));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    Ok(())
}
