//! Identity Service Library
//!
//! Username/password registration, login issuing opaque bearer tokens, and
//! token validation, served over HTTP.

pub mod api;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use domain::{CredentialStore, TokenIssuer};

use crate::api::{create_router, AppState};
use crate::config::IdentityServiceConfig;
use crate::infra::Database;
use crate::repository::{MemoryCredentialStore, SqlCredentialStore};
use crate::service::IdentityManager;

/// Which credential store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    InMemory,
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire the identity manager over `store` into application state.
pub fn build_state(
    store: Arc<dyn CredentialStore>,
    database: Option<Database>,
    token_lifetime_days: i64,
) -> AppState {
    let identity = IdentityManager::new(store, TokenIssuer::new(token_lifetime_days));
    AppState::new(Arc::new(identity), database)
}

/// Run the HTTP server until Ctrl+C.
pub async fn run_server(
    config: IdentityServiceConfig,
    backend: StoreBackend,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = match backend {
        StoreBackend::Postgres => {
            let db = Database::connect(&config.database).await?;
            let store = Arc::new(SqlCredentialStore::new(db.get_connection()));
            build_state(store, Some(db), config.token_lifetime_days)
        }
        StoreBackend::InMemory => {
            info!("Using in-memory credential store; data is lost on exit");
            let store = Arc::new(MemoryCredentialStore::new());
            build_state(store, None, config.token_lifetime_days)
        }
    };

    let app = create_router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        service = %config.server.service_name,
        token_lifetime_days = config.token_lifetime_days,
        "Listening on http://{}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: IdentityServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running migrations");
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
