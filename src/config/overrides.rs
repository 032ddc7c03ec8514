//! Typed overrides applied on top of a resolved configuration
//!
//! Every patch field is optional. Unset fields leave the base value alone,
//! nested records are patched field by field. Derived flags and the
//! runtime mode have no patch field and cannot be overridden.
//!
//! Patches deserialize from camelCase JSON, e.g.
//! `{"db": {"maxPoolConnections": 5}}`. Unknown keys are rejected.
//! The patched result is held to the same port and pool-size bounds as
//! the environment schema.

use serde::Deserialize;

use crate::config::error::{ConfigError, FieldError, ValidationErrors};
use crate::config::schema::{DB_MAX_POOL_CONNECTIONS, PORT};
use crate::config::settings::{Config, DatabaseConfig, LogFileSettings, LoggerSettings, SseSettings};
use crate::db::ResetMode;
use crate::logger::LogLevel;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigPatch {
    pub service_name: Option<String>,
    pub env: Option<String>,
    pub port: Option<u16>,
    pub healthcheck_timeout_ms: Option<u64>,
    pub graceful_shutdown_timeout_ms: Option<u64>,
    pub logger: Option<LoggerPatch>,
    pub db: Option<DatabasePatch>,
    pub sse: Option<SsePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggerPatch {
    pub level: Option<LogLevel>,
    pub level_is_stringified: Option<bool>,
    pub file: Option<LogFilePatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LogFilePatch {
    pub level: Option<LogLevel>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DatabasePatch {
    pub reset_mode: Option<ResetMode>,
    pub conn_string: Option<String>,
    pub max_pool_connections: Option<u32>,
    pub log: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SsePatch {
    pub history_timeframe_sec: Option<u64>,
    pub retry_ms: Option<u64>,
}

fn set_if<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl LogFileSettings {
    fn apply(&mut self, patch: LogFilePatch) {
        set_if(&mut self.level, patch.level);
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
    }
}

impl LoggerSettings {
    fn apply(&mut self, patch: LoggerPatch) {
        set_if(&mut self.level, patch.level);
        set_if(&mut self.level_is_stringified, patch.level_is_stringified);
        if let Some(file) = patch.file {
            self.file.apply(file);
        }
    }
}

impl DatabaseConfig {
    fn apply(&mut self, patch: DatabasePatch) {
        set_if(&mut self.reset_mode, patch.reset_mode);
        set_if(&mut self.conn_string, patch.conn_string);
        set_if(&mut self.max_pool_connections, patch.max_pool_connections);
        set_if(&mut self.log, patch.log);
    }
}

impl SseSettings {
    fn apply(&mut self, patch: SsePatch) {
        set_if(&mut self.history_timeframe_sec, patch.history_timeframe_sec);
        set_if(&mut self.retry_ms, patch.retry_ms);
    }
}

impl Config {
    /// A copy of this configuration with `patch` applied
    ///
    /// Fails when the patched port is 0 or the pool size drops below 1.
    pub fn with_overrides(&self, patch: ConfigPatch) -> Result<Config, ConfigError> {
        let mut config = self.clone();

        set_if(&mut config.service_name, patch.service_name);
        set_if(&mut config.env, patch.env);
        set_if(&mut config.port, patch.port);
        set_if(&mut config.healthcheck_timeout_ms, patch.healthcheck_timeout_ms);
        set_if(
            &mut config.graceful_shutdown_timeout_ms,
            patch.graceful_shutdown_timeout_ms,
        );
        if let Some(logger) = patch.logger {
            config.logger.apply(logger);
        }
        if let Some(db) = patch.db {
            config.db.apply(db);
        }
        if let Some(sse) = patch.sse {
            config.sse.apply(sse);
        }

        check_bounds(&config)?;
        Ok(config)
    }
}

fn check_bounds(config: &Config) -> Result<(), ConfigError> {
    let mut errors = ValidationErrors::new();
    if config.port == 0 {
        errors.push(FieldError::new(
            PORT,
            "Invalid port override: 0, expected 1-65535",
        ));
    }
    if config.db.max_pool_connections == 0 {
        errors.push(FieldError::new(
            DB_MAX_POOL_CONNECTIONS,
            "Invalid pool size override: 0, expected a positive integer",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
