//! Config command handler
//!
//! Prints the resolved configuration as pretty JSON with the database
//! password masked.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::db::ConnectionTarget;
use crate::error::{AppError, AppResult};

/// Shown instead of a connection string that cannot be parsed
const UNPARSEABLE: &str = "<unparseable>";

/// Handler for the config command
pub struct ConfigCommandHandler {
    config: Arc<Config>,
}

impl ConfigCommandHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> AppResult<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    /// Pretty JSON of the configuration, safe to print
    pub fn render(&self) -> AppResult<String> {
        let mut value = serde_json::to_value(&*self.config).map_err(anyhow::Error::from)?;

        // An unparseable string may still carry a password, so hide it whole
        let redacted = ConnectionTarget::parse(self.config.db().conn_string())
            .map(|target| target.redacted())
            .unwrap_or_else(|_| UNPARSEABLE.to_string());
        if let Some(db) = value.get_mut("db").and_then(Value::as_object_mut) {
            db.insert("conn_string".to_string(), Value::String(redacted));
        } else {
            return Err(AppError::Internal {
                source: anyhow::anyhow!("serialized configuration has no db section"),
            });
        }

        Ok(serde_json::to_string_pretty(&value).map_err(anyhow::Error::from)?)
    }
}
