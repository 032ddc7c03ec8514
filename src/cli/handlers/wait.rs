//! Wait command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::{WaitOptions, wait_for_db};
use crate::error::AppResult;

/// Handler for the wait command
pub struct WaitCommandHandler {
    config: Arc<Config>,
}

impl WaitCommandHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn execute(&self, allow_replica: bool, max_attempts: Option<u32>) -> AppResult<()> {
        let options = WaitOptions {
            allow_replica,
            max_attempts,
            ..Default::default()
        };
        wait_for_db(self.config.db(), &options).await?;
        Ok(())
    }
}
