//! Configuration error types

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single rejected environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the offending variable, e.g. `DB_CONNECTION_STRING`
    pub name: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Every violation found during one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any violation names the given variable
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|e| e.name == name)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&lines.join("\n"))
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read or parsed
    #[error("Failed to load config from {}: {reason}", path.display())]
    Load {
        /// Path of the offending file
        path: PathBuf,
        /// Parser or I/O message
        reason: String,
    },

    /// One or more environment variables are missing or malformed
    #[error("Failed to load config from env:\n{0}")]
    Validation(ValidationErrors),

    /// `IS_PRODUCTION_ENV` is set while the runtime mode is not production
    #[error("IS_PRODUCTION_ENV is set to true, but NODE_ENV is {node_env}, not production")]
    ProductionMismatch {
        /// The runtime mode that was actually resolved
        node_env: String,
    },
}

impl ConfigError {
    /// Create a new load error
    pub fn load<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        ConfigError::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The aggregated violations, if this is a validation error
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ConfigError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
