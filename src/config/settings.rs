//! Resolved configuration structures
//!
//! A `Config` is built once from a [`ValidatedEnv`] and never changes
//! afterwards. Fields are private and read through accessors; the only way
//! to obtain a different configuration is to build a new value, see
//! [`Config::with_overrides`](crate::config::ConfigPatch).

use serde::Serialize;

use crate::config::environment::NodeEnv;
use crate::config::error::ConfigError;
use crate::config::schema::ValidatedEnv;
use crate::db::ResetMode;
use crate::logger::{LevelLabel, LogLevel};

// ============================================================================
// Logger settings
// ============================================================================

/// File sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogFileSettings {
    pub(crate) level: LogLevel,
    pub(crate) name: Option<String>,
}

impl LogFileSettings {
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Configured file name, `None` means the default sink path
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the file sink is enabled at all
    pub fn is_enabled(&self) -> bool {
        self.level != LogLevel::Silent
    }
}

/// Logger settings handed to [`crate::logger::init_logger`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggerSettings {
    pub(crate) level: LogLevel,
    pub(crate) level_is_stringified: bool,
    pub(crate) file: LogFileSettings,
}

impl LoggerSettings {
    /// Console sink level
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn level_is_stringified(&self) -> bool {
        self.level_is_stringified
    }

    pub fn level_label(&self) -> LevelLabel {
        LevelLabel::from_stringified(self.level_is_stringified)
    }

    pub fn file(&self) -> &LogFileSettings {
        &self.file
    }

    /// Most verbose level across both sinks
    pub fn max_level(&self) -> LogLevel {
        self.level.most_verbose(self.file.level)
    }
}

// ============================================================================
// Database settings
// ============================================================================

/// Database settings handed to the `db` utilities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    pub(crate) reset_mode: ResetMode,
    pub(crate) conn_string: String,
    pub(crate) max_pool_connections: u32,
    pub(crate) log: bool,
}

impl DatabaseConfig {
    pub fn reset_mode(&self) -> ResetMode {
        self.reset_mode
    }

    pub fn conn_string(&self) -> &str {
        &self.conn_string
    }

    pub fn max_pool_connections(&self) -> u32 {
        self.max_pool_connections
    }

    /// Whether executed queries are logged at debug level
    pub fn log(&self) -> bool {
        self.log
    }
}

// ============================================================================
// Server-sent events settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SseSettings {
    pub(crate) history_timeframe_sec: u64,
    pub(crate) retry_ms: u64,
}

impl SseSettings {
    pub fn history_timeframe_sec(&self) -> u64 {
        self.history_timeframe_sec
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub(crate) is_prod: bool,
    pub(crate) is_deployment: bool,
    pub(crate) is_dev: bool,
    pub(crate) is_test: bool,
    pub(crate) service_name: String,
    pub(crate) env: String,
    pub(crate) node_env: NodeEnv,
    pub(crate) port: u16,
    pub(crate) healthcheck_timeout_ms: u64,
    pub(crate) graceful_shutdown_timeout_ms: u64,
    pub(crate) logger: LoggerSettings,
    pub(crate) db: DatabaseConfig,
    pub(crate) sse: SseSettings,
}

impl Config {
    /// Build a configuration from validated values
    ///
    /// Fails when `IS_PRODUCTION_ENV` is set outside production mode.
    pub fn from_validated(validated: ValidatedEnv) -> Result<Self, ConfigError> {
        let is_deployment = validated.node_env == NodeEnv::Production;

        if validated.is_production_env && !is_deployment {
            return Err(ConfigError::ProductionMismatch {
                node_env: validated.node_env.to_string(),
            });
        }

        Ok(Self {
            is_prod: is_deployment && validated.is_production_env,
            is_deployment,
            is_dev: validated.node_env == NodeEnv::Development,
            is_test: validated.node_env == NodeEnv::Test,
            service_name: validated.service_name,
            env: validated.env,
            node_env: validated.node_env,
            port: validated.port,
            healthcheck_timeout_ms: validated.healthcheck_timeout_ms,
            graceful_shutdown_timeout_ms: validated.graceful_shutdown_timeout_ms,
            logger: LoggerSettings {
                level: validated.log_level,
                level_is_stringified: validated.log_level_is_stringified,
                file: LogFileSettings {
                    level: validated.log_file_level,
                    name: validated.log_file_name,
                },
            },
            db: DatabaseConfig {
                reset_mode: validated.db_reset_mode,
                conn_string: validated.db_connection_string,
                max_pool_connections: validated.db_max_pool_connections,
                log: false,
            },
            sse: SseSettings {
                history_timeframe_sec: validated.sse_history_timeframe_sec,
                retry_ms: validated.sse_retry,
            },
        })
    }

    /// Production mode with the explicit production marker set
    pub fn is_prod(&self) -> bool {
        self.is_prod
    }

    /// Running in production mode, whether or not it is the live deployment
    pub fn is_deployment(&self) -> bool {
        self.is_deployment
    }

    pub fn is_dev(&self) -> bool {
        self.is_dev
    }

    pub fn is_test(&self) -> bool {
        self.is_test
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Deployment scope tag, e.g. `staging`
    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn node_env(&self) -> NodeEnv {
        self.node_env
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn healthcheck_timeout_ms(&self) -> u64 {
        self.healthcheck_timeout_ms
    }

    pub fn graceful_shutdown_timeout_ms(&self) -> u64 {
        self.graceful_shutdown_timeout_ms
    }

    pub fn logger(&self) -> &LoggerSettings {
        &self.logger
    }

    pub fn db(&self) -> &DatabaseConfig {
        &self.db
    }

    pub fn sse(&self) -> &SseSettings {
        &self.sse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::EnvMap;
    use crate::config::schema::validate_env;

    fn validated(pairs: &[(&str, &str)]) -> ValidatedEnv {
        let mut env: EnvMap = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.entry("DB_CONNECTION_STRING".to_string())
            .or_insert_with(|| "postgres://app@localhost/app".to_string());
        validate_env(&env).unwrap()
    }

    #[test]
    fn test_development_flags() {
        let config = Config::from_validated(validated(&[("NODE_ENV", "development")])).unwrap();
        assert!(config.is_dev());
        assert!(!config.is_test());
        assert!(!config.is_deployment());
        assert!(!config.is_prod());
    }

    #[test]
    fn test_production_without_marker_is_not_prod() {
        let config = Config::from_validated(validated(&[("NODE_ENV", "production")])).unwrap();
        assert!(config.is_deployment());
        assert!(!config.is_prod());
    }

    #[test]
    fn test_production_with_marker_is_prod() {
        let config = Config::from_validated(validated(&[
            ("NODE_ENV", "production"),
            ("IS_PRODUCTION_ENV", "true"),
        ]))
        .unwrap();
        assert!(config.is_deployment());
        assert!(config.is_prod());
    }

    #[test]
    fn test_production_marker_outside_production_is_rejected() {
        let err = Config::from_validated(validated(&[
            ("NODE_ENV", "development"),
            ("IS_PRODUCTION_ENV", "true"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::ProductionMismatch { ref node_env } if node_env == "development"));
    }

    #[test]
    fn test_nested_settings_are_carried() {
        let config = Config::from_validated(validated(&[
            ("NODE_ENV", "test"),
            ("LOG_LEVEL", "warn"),
            ("LOG_FILE_LEVEL", "debug"),
            ("LOG_FILE_NAME", "svc.log"),
            ("LOG_LEVEL_IS_STRINGIFIED", "false"),
            ("DB_MAX_POOL_CONNECTIONS", "4"),
            ("SSE_RETRY", "250"),
        ]))
        .unwrap();

        assert_eq!(config.logger().level(), LogLevel::Warn);
        assert_eq!(config.logger().file().name(), Some("svc.log"));
        assert!(config.logger().file().is_enabled());
        assert_eq!(config.logger().max_level(), LogLevel::Debug);
        assert_eq!(config.logger().level_label(), LevelLabel::Numeric);
        assert_eq!(config.db().max_pool_connections(), 4);
        assert_eq!(config.db().reset_mode(), ResetMode::None);
        assert!(!config.db().log());
        assert_eq!(config.sse().retry_ms(), 250);
        assert_eq!(config.sse().history_timeframe_sec(), 600);
    }

    #[test]
    fn test_mutating_a_clone_leaves_original_untouched() {
        let original = Config::from_validated(validated(&[("NODE_ENV", "test")])).unwrap();
        let mut copy = original.clone();
        copy.port = 9999;
        copy.db.max_pool_connections = 1;

        assert_eq!(original.port(), 3000);
        assert_eq!(original.db().max_pool_connections(), 10);
    }
}
