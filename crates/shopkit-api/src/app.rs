//! Application builder: wires stores, cache and services into an Axum app
//! and serves it.

use std::sync::Arc;

use axum::Router;
use tracing::{error, info};

use shopkit_auth::SessionSweeper;
use shopkit_cache::CacheManager;
use shopkit_core::config::{AppConfig, DatabaseConfig};
use shopkit_core::error::AppError;
use shopkit_core::result::AppResult;
use shopkit_database::migration::run_migrations;
use shopkit_database::reference::seed_reference_data;
use shopkit_database::{DatabasePool, MemoryStore, Stores};
use shopkit_service::ServiceRegistry;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Opens the configured backend.
///
/// With `migrate`, pending migrations are applied to a postgres backend. A
/// memory backend starts empty apart from the reference roles and
/// permissions.
pub async fn open_stores(config: &DatabaseConfig, migrate: bool) -> AppResult<Stores> {
    match DatabasePool::connect_if_postgres(config).await? {
        Some(pool) => {
            if migrate {
                run_migrations(pool.pool()).await?;
            }
            Ok(Stores::postgres(pool))
        }
        None => {
            let store = Arc::new(MemoryStore::new());
            seed_reference_data(store.as_ref()).await?;
            info!("Using in-memory storage; data is lost on shutdown");
            Ok(Stores::memory(store))
        }
    }
}

/// Connects every backend and constructs the services.
pub async fn build_state(config: AppConfig, migrate: bool) -> AppResult<AppState> {
    let stores = open_stores(&config.database, migrate).await?;

    info!(provider = %config.cache.provider, "Opening cache");
    let cache = CacheManager::new(&config.cache).await?;

    let services = ServiceRegistry::new(stores, cache, &config);
    Ok(AppState::new(config, services))
}

/// Serves `state` until Ctrl+C or SIGTERM.
pub async fn run_server(state: AppState) -> AppResult<()> {
    let addr = state.config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    let sweeper = SessionSweeper::new(
        state.services.stores.sessions.clone(),
        state.config.session.sweep_interval(),
    )
    .spawn();
    let app = build_app(state);

    info!(%addr, "shopkit server listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served.map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
