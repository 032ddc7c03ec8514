//! Migrate command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::migrate_db;
use crate::error::AppResult;

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Arc<Config>,
}

impl MigrateCommandHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Apply every pending migration
    pub async fn execute(&self) -> AppResult<()> {
        migrate_db(self.config.db()).await?;
        Ok(())
    }
}
