//! Schema validation of the effective environment
//!
//! Every recognized variable is coerced, checked against its choices and
//! defaulted in one pass. Violations are collected rather than returned
//! one at a time, so a broken deployment reports everything it needs in a
//! single start attempt.
//!
//! An empty value is treated exactly like an unset one.

use std::str::FromStr;

use crate::config::env::EnvMap;
use crate::config::environment::NodeEnv;
use crate::config::error::{ConfigError, FieldError, ValidationErrors};
use crate::db::ResetMode;
use crate::logger::LogLevel;

pub const ENV: &str = "ENV";
pub const IS_PRODUCTION_ENV: &str = "IS_PRODUCTION_ENV";
pub const SERVICE_NAME: &str = "SERVICE_NAME";
pub const PORT: &str = "PORT";
pub const HEALTHCHECK_TIMEOUT_MS: &str = "HEALTHCHECK_TIMEOUT_MS";
pub const GRACEFUL_SHUTDOWN_TIMEOUT_MS: &str = "GRACEFUL_SHUTDOWN_TIMEOUT_MS";
pub const SSE_HISTORY_TIMEFRAME_SEC: &str = "SSE_HISTORY_TIMEFRAME_SEC";
pub const SSE_RETRY: &str = "SSE_RETRY";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FILE_LEVEL: &str = "LOG_FILE_LEVEL";
pub const LOG_FILE_NAME: &str = "LOG_FILE_NAME";
pub const LOG_LEVEL_IS_STRINGIFIED: &str = "LOG_LEVEL_IS_STRINGIFIED";
pub const DB_RESET_MODE: &str = "DB_RESET_MODE";
pub const DB_CONNECTION_STRING: &str = "DB_CONNECTION_STRING";
pub const DB_MAX_POOL_CONNECTIONS: &str = "DB_MAX_POOL_CONNECTIONS";

const DEFAULT_ENV_TAG: &str = "development";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HEALTHCHECK_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_SSE_HISTORY_TIMEFRAME_SEC: u64 = 600;
const DEFAULT_SSE_RETRY: u64 = 1000;
const DEFAULT_MAX_POOL_CONNECTIONS: u32 = 10;

/// Typed view of every recognized variable after defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEnv {
    pub node_env: NodeEnv,
    pub env: String,
    pub is_production_env: bool,
    pub service_name: String,
    pub port: u16,
    pub healthcheck_timeout_ms: u64,
    pub graceful_shutdown_timeout_ms: u64,
    pub sse_history_timeframe_sec: u64,
    pub sse_retry: u64,
    pub log_level: LogLevel,
    pub log_file_level: LogLevel,
    pub log_file_name: Option<String>,
    pub log_level_is_stringified: bool,
    pub db_reset_mode: ResetMode,
    pub db_connection_string: String,
    pub db_max_pool_connections: u32,
}

/// Default reset mode for a runtime mode
///
/// Only development defaults to `recreate`; every other mode must opt in.
pub fn default_reset_mode(node_env: NodeEnv) -> ResetMode {
    match node_env {
        NodeEnv::Development => ResetMode::Recreate,
        NodeEnv::Production | NodeEnv::Test => ResetMode::None,
    }
}

/// Validate and normalize the effective environment
pub fn validate_env(env: &EnvMap) -> Result<ValidatedEnv, ConfigError> {
    let mut v = Validator::new(env);

    let node_env = v.required_choice(NodeEnv::ENV_VAR, NodeEnv::Development);
    let reset_default = if v.is_clean(NodeEnv::ENV_VAR) {
        default_reset_mode(node_env)
    } else {
        ResetMode::None
    };

    let validated = ValidatedEnv {
        node_env,
        env: v.string_or(ENV, DEFAULT_ENV_TAG),
        is_production_env: v.bool_or(IS_PRODUCTION_ENV, false),
        service_name: v.string_or(SERVICE_NAME, crate::pkg_name()),
        port: v.port_or(PORT, DEFAULT_PORT),
        healthcheck_timeout_ms: v.uint_or(HEALTHCHECK_TIMEOUT_MS, DEFAULT_HEALTHCHECK_TIMEOUT_MS),
        graceful_shutdown_timeout_ms: v
            .uint_or(GRACEFUL_SHUTDOWN_TIMEOUT_MS, DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_MS),
        sse_history_timeframe_sec: v
            .uint_or(SSE_HISTORY_TIMEFRAME_SEC, DEFAULT_SSE_HISTORY_TIMEFRAME_SEC),
        sse_retry: v.uint_or(SSE_RETRY, DEFAULT_SSE_RETRY),
        log_level: v.choice_or(LOG_LEVEL, LogLevel::Info),
        log_file_level: v.choice_or(LOG_FILE_LEVEL, LogLevel::Silent),
        log_file_name: v.optional_string(LOG_FILE_NAME),
        log_level_is_stringified: v.bool_or(LOG_LEVEL_IS_STRINGIFIED, true),
        db_reset_mode: v.choice_or(DB_RESET_MODE, reset_default),
        db_connection_string: v.required_string(DB_CONNECTION_STRING),
        db_max_pool_connections: v.pool_size_or(DB_MAX_POOL_CONNECTIONS, DEFAULT_MAX_POOL_CONNECTIONS),
    };

    v.finish(validated)
}

/// Collects violations while handing back placeholder values
///
/// Placeholders never escape: `finish` returns the error list whenever
/// anything was recorded.
struct Validator<'a> {
    env: &'a EnvMap,
    errors: ValidationErrors,
}

impl<'a> Validator<'a> {
    fn new(env: &'a EnvMap) -> Self {
        Self {
            env,
            errors: ValidationErrors::new(),
        }
    }

    fn raw(&self, name: &str) -> Option<&'a str> {
        self.env
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn reject(&mut self, name: &str, message: String) {
        self.errors.push(FieldError::new(name, message));
    }

    fn is_clean(&self, name: &str) -> bool {
        !self.errors.contains(name)
    }

    fn required_choice<T>(&mut self, name: &str, placeholder: T) -> T
    where
        T: FromStr<Err = String>,
    {
        match self.raw(name) {
            Some(raw) => self.parse_choice(name, raw, placeholder),
            None => {
                self.reject(name, "Missing required environment variable".to_string());
                placeholder
            }
        }
    }

    fn choice_or<T>(&mut self, name: &str, default: T) -> T
    where
        T: FromStr<Err = String>,
    {
        match self.raw(name) {
            Some(raw) => self.parse_choice(name, raw, default),
            None => default,
        }
    }

    fn parse_choice<T>(&mut self, name: &str, raw: &str, fallback: T) -> T
    where
        T: FromStr<Err = String>,
    {
        match raw.parse() {
            Ok(value) => value,
            Err(message) => {
                self.reject(name, message);
                fallback
            }
        }
    }

    fn required_string(&mut self, name: &str) -> String {
        match self.raw(name) {
            Some(raw) => raw.to_string(),
            None => {
                self.reject(name, "Missing required environment variable".to_string());
                String::new()
            }
        }
    }

    fn string_or(&mut self, name: &str, default: &str) -> String {
        self.raw(name).unwrap_or(default).to_string()
    }

    fn optional_string(&mut self, name: &str) -> Option<String> {
        self.raw(name).map(str::to_string)
    }

    fn bool_or(&mut self, name: &str, default: bool) -> bool {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "on" | "1" => true,
            "false" | "f" | "no" | "off" | "0" => false,
            _ => {
                self.reject(name, format!("Invalid bool input: \"{}\"", raw));
                default
            }
        }
    }

    fn uint_or(&mut self, name: &str, default: u64) -> u64 {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(_) => {
                self.reject(name, format!("Invalid number input: \"{}\"", raw));
                default
            }
        }
    }

    fn port_or(&mut self, name: &str, default: u16) -> u16 {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match raw.trim().parse::<u16>() {
            Ok(port) if port >= 1 => port,
            _ => {
                self.reject(
                    name,
                    format!("Invalid port input: \"{}\", expected 1-65535", raw),
                );
                default
            }
        }
    }

    fn pool_size_or(&mut self, name: &str, default: u32) -> u32 {
        let Some(raw) = self.raw(name) else {
            return default;
        };
        match raw.trim().parse::<u32>() {
            Ok(size) if size >= 1 => size,
            _ => {
                self.reject(
                    name,
                    format!("Invalid pool size input: \"{}\", expected a positive integer", raw),
                );
                default
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ConfigError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ConfigError::Validation(self.errors))
        }
    }
}
