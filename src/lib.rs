//! Teamwork API
//!
//! Team collaboration backend managing:
//! - User accounts with argon2 password hashes
//! - Teams, created together with a project manager membership
//! - Team memberships with per-team roles

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::StorageBackend;
use infrastructure::{
    storage::{connect_pool, run_schema_migrations, InMemoryDatabase, PostgresHealthCheck},
    team::{InMemoryTeamRepository, PostgresTeamRepository},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository},
};
use tracing::info;

/// Create the application state for the configured storage backend.
/// The Postgres backend connects and applies pending migrations first.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    info!(backend = ?config.storage.backend, "Initializing storage");

    match config.storage.backend {
        StorageBackend::Memory => Ok(in_memory_state()),
        StorageBackend::Postgres => {
            let pool = connect_pool(&config.database.to_postgres_config()).await?;

            let applied = run_schema_migrations(&pool).await?;
            info!(applied, "Schema migrations up to date");

            Ok(AppState::from_repositories(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresTeamRepository::new(pool.clone())),
                Arc::new(Argon2Hasher::new()),
                Arc::new(PostgresHealthCheck::new(pool)),
            ))
        }
    }
}

/// Application state over one shared in-memory table set
pub fn in_memory_state() -> AppState {
    let db = InMemoryDatabase::new();

    AppState::from_repositories(
        Arc::new(InMemoryUserRepository::with_database(db.clone())),
        Arc::new(InMemoryTeamRepository::with_database(db.clone())),
        Arc::new(Argon2Hasher::new()),
        Arc::new(db),
    )
}
