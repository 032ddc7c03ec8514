//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use std::path::PathBuf;

/// Validate the config directory path
///
/// A missing directory is accepted, a regular file is not.
pub fn validate_config_dir(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if path.exists() && !path.is_dir() {
        return Err(format!("Configuration path is not a directory: '{}'", path_str));
    }

    Ok(path)
}

/// Validate the probe limit is a positive number
pub fn validate_max_attempts(attempts_str: &str) -> Result<u32, String> {
    let attempts: u32 = attempts_str.parse().map_err(|_| {
        format!(
            "Max attempts must be a valid positive number, got: '{}'",
            attempts_str
        )
    })?;

    if attempts == 0 {
        return Err("Max attempts must be greater than 0".to_string());
    }

    Ok(attempts)
}
