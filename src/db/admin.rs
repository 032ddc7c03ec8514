//! Database lifecycle: create, drop and reset
//!
//! `CREATE DATABASE` and `DROP DATABASE` cannot run while connected to the
//! database in question, so both go through the maintenance database.

use diesel::QueryableByName;
use diesel::sql_types::Text;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::config::DatabaseConfig;
use crate::db::ResetMode;
use crate::db::connection::{ConnectionTarget, quote_identifier};
use crate::db::migrate::migrate_db;
use crate::error::{AppError, AppResult};

#[derive(QueryableByName)]
struct DatabaseRow {
    #[diesel(sql_type = Text)]
    #[allow(dead_code)]
    datname: String,
}

#[derive(QueryableByName)]
struct TableRow {
    #[diesel(sql_type = Text)]
    tablename: String,
}

async fn connect(url: &str, operation: &str) -> AppResult<AsyncPgConnection> {
    AsyncPgConnection::establish(url)
        .await
        .map_err(|e| AppError::database(operation, e))
}

/// Create the configured database unless it already exists
pub async fn create_database(config: &DatabaseConfig) -> AppResult<()> {
    let target = ConnectionTarget::parse(config.conn_string())?;
    let db_name = target.database_name()?;
    tracing::info!("Creating database {}", db_name);

    let mut conn = connect(&target.maintenance_url(), "connect to maintenance database").await?;

    // PostgreSQL has no CREATE DATABASE IF NOT EXISTS
    let existing: Vec<DatabaseRow> =
        diesel::sql_query("SELECT datname FROM pg_catalog.pg_database WHERE datname = $1")
            .bind::<Text, _>(db_name)
            .load(&mut conn)
            .await
            .map_err(|e| AppError::database("look up database", e))?;

    if existing.is_empty() {
        // Identifiers cannot be bound as parameters
        let statement = format!(
            "CREATE DATABASE {} ENCODING='UTF8' LOCALE='C' TEMPLATE='template0'",
            quote_identifier(db_name)
        );
        diesel::sql_query(statement)
            .execute(&mut conn)
            .await
            .map_err(|e| AppError::database("create database", e))?;
        tracing::info!("Database {} created", db_name);
    } else {
        tracing::info!("Database {} already exists", db_name);
    }

    Ok(())
}

/// Drop the configured database
///
/// Refused when the reset mode is `none`; `env` names the deployment in
/// the refusal.
pub async fn drop_database(config: &DatabaseConfig, env: &str) -> AppResult<()> {
    if config.reset_mode() == ResetMode::None {
        return Err(AppError::DropDisabled {
            env: env.to_string(),
        });
    }

    let target = ConnectionTarget::parse(config.conn_string())?;
    let db_name = target.database_name()?;
    tracing::info!("Dropping database {}", db_name);

    let mut conn = connect(&target.maintenance_url(), "connect to maintenance database").await?;
    diesel::sql_query(format!("DROP DATABASE IF EXISTS {}", quote_identifier(db_name)))
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::database("drop database", e))?;

    tracing::info!("Database {} dropped", db_name);
    Ok(())
}

/// Drop every table in the `public` schema of the configured database
///
/// Migration bookkeeping lives there too, so migrations re-run afterwards.
pub async fn drop_tables(config: &DatabaseConfig) -> AppResult<Vec<String>> {
    let mut conn = connect(config.conn_string(), "connect to database").await?;

    let tables: Vec<TableRow> =
        diesel::sql_query("SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = 'public'")
            .load(&mut conn)
            .await
            .map_err(|e| AppError::database("list tables", e))?;

    let mut dropped = Vec::with_capacity(tables.len());
    for table in tables {
        diesel::sql_query(format!(
            "DROP TABLE IF EXISTS \"public\".{} CASCADE",
            quote_identifier(&table.tablename)
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::database(format!("drop table {}", table.tablename), e))?;
        tracing::info!(table = %table.tablename, "Dropped table");
        dropped.push(table.tablename);
    }

    Ok(dropped)
}

/// Reset the configured database according to its reset mode, then migrate
pub async fn reset_db(config: &DatabaseConfig, env: &str) -> AppResult<()> {
    match config.reset_mode() {
        ResetMode::Recreate => {
            drop_database(config, env).await?;
            create_database(config).await?;
        }
        ResetMode::DropTables => {
            drop_tables(config).await?;
        }
        mode @ ResetMode::None => return Err(AppError::ResetUnsupported { mode }),
    }

    migrate_db(config).await?;
    Ok(())
}
