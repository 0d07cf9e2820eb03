//! Database migration runner.
//!
//! Migrations are reversible (`.up.sql` / `.down.sql` pairs) and embedded
//! into the binary at compile time.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use shopkit_core::error::{AppError, ErrorKind};
use shopkit_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// State of one known migration.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    /// When it was applied, `None` while pending.
    pub installed_on: Option<DateTime<Utc>>,
}

impl MigrationStatus {
    /// Whether the migration has been applied.
    pub fn is_applied(&self) -> bool {
        self.installed_on.is_some()
    }
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations...");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Database migrations completed successfully");
    Ok(())
}

/// List every embedded migration with its applied state.
pub async fn migration_status(pool: &PgPool) -> AppResult<Vec<MigrationStatus>> {
    let applied = applied_versions(pool).await?;

    Ok(MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            installed_on: applied
                .iter()
                .find(|(version, _)| *version == m.version)
                .map(|(_, at)| *at),
        })
        .collect())
}

/// Revert the most recently applied migration. Returns its version.
pub async fn revert_latest(pool: &PgPool) -> AppResult<Option<i64>> {
    let applied = applied_versions(pool).await?;
    let Some((latest, _)) = applied.last().copied() else {
        return Ok(None);
    };
    let target = applied
        .iter()
        .rev()
        .nth(1)
        .map(|(version, _)| *version)
        .unwrap_or(0);

    undo_to(pool, target).await?;
    info!(version = latest, "Reverted migration");
    Ok(Some(latest))
}

/// Revert every applied migration.
pub async fn revert_all(pool: &PgPool) -> AppResult<()> {
    undo_to(pool, 0).await?;
    info!("Reverted all migrations");
    Ok(())
}

async fn undo_to(pool: &PgPool, target: i64) -> AppResult<()> {
    MIGRATOR.undo(pool, target).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to revert migrations: {e}"),
            e,
        )
    })
}

/// Applied versions in ascending order. Empty before the first run.
async fn applied_versions(pool: &PgPool) -> AppResult<Vec<(i64, DateTime<Utc>)>> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
         WHERE table_name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to inspect migrations", e))?;

    if !table_exists {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, (i64, DateTime<Utc>)>(
        "SELECT version, installed_on FROM _sqlx_migrations WHERE success ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list migrations", e))
}
