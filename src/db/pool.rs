//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::future::Future;
use std::pin::Pin;

use diesel::ConnectionResult;
use diesel::connection::InstrumentationEvent;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// Target for executed-query events when `db.log` is on
pub const QUERY_LOG_TARGET: &str = "svc_bootstrap::db::query";

/// Creates an async database connection pool from the database settings.
///
/// The pool holds at most `max_pool_connections` connections. With `log`
/// enabled every executed query is emitted at debug level.
pub async fn establish_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    // bb8 panics on a zero max size
    if config.max_pool_connections() == 0 {
        return Err(AppError::Validation {
            field: "max_pool_connections".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    let url = config.conn_string();
    let manager = if config.log() {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(establish_logged_connection);
        AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(url, manager_config)
    } else {
        AsyncDieselConnectionManager::<AsyncPgConnection>::new(url)
    };

    Pool::builder()
        .max_size(config.max_pool_connections())
        .build(manager)
        .await
        .map_err(|e| AppError::ConnectionPool {
            source: anyhow::Error::from(e),
        })
}

/// Check out a connection and run `SELECT 1`
pub async fn ping(pool: &AsyncDbPool) -> AppResult<()> {
    let mut conn = pool.get().await.map_err(|e| AppError::ConnectionPool {
        source: anyhow::Error::from(e),
    })?;
    diesel::sql_query("SELECT 1")
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database("ping", e))?;
    Ok(())
}

fn establish_logged_connection(
    url: &str,
) -> Pin<Box<dyn Future<Output = ConnectionResult<AsyncPgConnection>> + Send + '_>> {
    Box::pin(async move {
        let mut conn = AsyncPgConnection::establish(url).await?;
        conn.set_instrumentation(|event: InstrumentationEvent<'_>| {
            if let InstrumentationEvent::StartQuery { query, .. } = event {
                tracing::debug!(target: QUERY_LOG_TARGET, query = %query, "Query");
            }
        });
        Ok(conn)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ResetMode;

    fn db_config(max_pool_connections: u32) -> DatabaseConfig {
        DatabaseConfig {
            reset_mode: ResetMode::None,
            conn_string: "postgres://app@127.0.0.1:1/app".to_string(),
            max_pool_connections,
            log: false,
        }
    }

    #[tokio::test]
    async fn test_zero_pool_size_is_an_error() {
        let err = establish_pool(&db_config(0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "max_pool_connections"));
    }
}
