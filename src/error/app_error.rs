use thiserror::Error;

use crate::config::ConfigError;
use crate::db::ResetMode;
use crate::logger::LoggerError;

/// Application-wide error type for the bootstrap commands
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logger could not be installed
    #[error(transparent)]
    Logger(#[from] LoggerError),

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Connection string is not a usable PostgreSQL URL
    #[error("Invalid connection string: {reason}")]
    ConnectionString { reason: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Drop requested while destructive resets are disabled
    #[error("Dropping database is disabled for env {env}. Please do it manually if it's what you want")]
    DropDisabled { env: String },

    /// Reset requested with a mode that cannot reset
    #[error("We can't reset database with reset mode {mode}")]
    ResetUnsupported { mode: ResetMode },

    /// Database still unavailable after the last allowed attempt
    #[error("Database is not ready after {attempts} attempt(s)")]
    NotReady { attempts: u32 },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn database<E>(operation: impl Into<String>, error: E) -> Self
    where
        E: std::fmt::Display,
    {
        AppError::Database {
            operation: operation.into(),
            source: anyhow::anyhow!("{}", error),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        AppError::Database {
            operation: "database operation".to_string(),
            source: anyhow::Error::from(error),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        AppError::Internal {
            source: anyhow::Error::from(error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
