//! Create, drop and reset command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::{create_database, drop_database, reset_db};
use crate::error::AppResult;

/// Database lifecycle operation requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseAction {
    Create,
    Drop,
    Reset,
}

/// Handler for the create-db, drop-db and reset commands
pub struct DatabaseCommandHandler {
    config: Arc<Config>,
}

impl DatabaseCommandHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub async fn execute(&self, action: DatabaseAction) -> AppResult<()> {
        let db = self.config.db();
        let env = self.config.env();

        match action {
            DatabaseAction::Create => create_database(db).await,
            DatabaseAction::Drop => drop_database(db, env).await,
            DatabaseAction::Reset => reset_db(db, env).await,
        }
    }
}
