//! Embedded schema migrations

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration, returning the applied versions
///
/// diesel_migrations is synchronous, so this runs on a blocking thread.
pub async fn migrate_db(config: &DatabaseConfig) -> AppResult<Vec<String>> {
    tracing::info!("Running migrations");

    let database_url = config.conn_string().to_string();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|e| AppError::database("establish connection for migrations", e))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::database("run pending migrations", e))?;

        Ok::<_, AppError>(applied.iter().map(|m| m.to_string()).collect::<Vec<_>>())
    })
    .await??;

    if applied.is_empty() {
        tracing::info!("No migrations to apply, database is up to date");
    } else {
        for version in &applied {
            tracing::info!(version = %version, "Applied migration");
        }
        tracing::info!(count = applied.len(), "Migrations completed");
    }

    Ok(applied)
}
