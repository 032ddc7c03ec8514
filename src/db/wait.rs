//! Wait until the database accepts connections

use std::time::Duration;

use diesel::QueryableByName;
use diesel::sql_types::Bool;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Delay between two probes
pub const RETRY_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Accept a hot standby as ready
    pub allow_replica: bool,
    /// Give up after this many probes, `None` waits forever
    pub max_attempts: Option<u32>,
    pub retry_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            allow_replica: false,
            max_attempts: None,
            retry_interval: RETRY_INTERVAL,
        }
    }
}

#[derive(QueryableByName)]
struct RecoveryRow {
    #[diesel(sql_type = Bool)]
    in_recovery: bool,
}

async fn probe(url: &str, allow_replica: bool) -> AppResult<()> {
    let mut conn = AsyncPgConnection::establish(url)
        .await
        .map_err(|e| AppError::database("connect", e))?;

    let row: RecoveryRow = diesel::sql_query("SELECT pg_is_in_recovery() AS in_recovery")
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::database("check recovery status", e))?;

    if row.in_recovery && !allow_replica {
        return Err(AppError::database(
            "check recovery status",
            "Replica connected, not master. Use --allow-replica flag to allow it",
        ));
    }

    Ok(())
}

/// Probe the database until it is ready, returning the number of attempts
pub async fn wait_for_db(config: &DatabaseConfig, options: &WaitOptions) -> AppResult<u32> {
    if options.max_attempts == Some(0) {
        return Err(AppError::Validation {
            field: "max_attempts".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    tracing::info!(
        "Waiting for DB connection, replica {} allowed",
        if options.allow_replica { "IS" } else { "IS NOT" }
    );

    let mut attempts = 0;
    loop {
        attempts += 1;
        match probe(config.conn_string(), options.allow_replica).await {
            Ok(()) => {
                tracing::info!(attempts, "Database is present & operational");
                return Ok(attempts);
            }
            Err(e) => {
                if options.max_attempts.is_some_and(|max| attempts >= max) {
                    tracing::warn!(error = %e, attempts, "Giving up on database");
                    return Err(AppError::NotReady { attempts });
                }
                tracing::info!(
                    error = %e,
                    "Error connecting DB, retrying in {} ms",
                    options.retry_interval.as_millis()
                );
                tokio::time::sleep(options.retry_interval).await;
            }
        }
    }
}
