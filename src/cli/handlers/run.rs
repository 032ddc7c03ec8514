//! Run command handler
//!
//! Verifies the database is usable, then idles until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;

use crate::config::Config;
use crate::db::{AsyncDbPool, establish_pool, ping};
use crate::error::AppResult;

/// How often the drain loop re-checks the pool
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handler for the run command
pub struct RunCommandHandler {
    config: Arc<Config>,
}

impl RunCommandHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn execute(&self) -> AppResult<()> {
        let pool = establish_pool(self.config.db()).await?;
        ping(&pool).await?;
        tracing::info!(
            service = %self.config.service_name(),
            port = self.config.port(),
            "DB works fine"
        );

        shutdown_signal().await;

        let timeout = Duration::from_millis(self.config.graceful_shutdown_timeout_ms());
        if tokio::time::timeout(timeout, drain(&pool)).await.is_err() {
            tracing::warn!(
                timeout_ms = self.config.graceful_shutdown_timeout_ms(),
                "Connections still checked out at shutdown deadline"
            );
        }
        drop(pool);

        tracing::info!("Shutdown complete");
        Ok(())
    }
}

/// Resolves once no connection is checked out of the pool
async fn drain(pool: &AsyncDbPool) {
    loop {
        let state = pool.state();
        if state.connections == state.idle_connections {
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
