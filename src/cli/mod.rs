//! CLI module for svc-bootstrap
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing with clap
//! - Configuration resolution and logger installation
//! - Command handlers for the database lifecycle

pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

// Re-export public types for convenience
pub use executor::execute_command;
pub use parser::{Cli, Commands};

use std::sync::Arc;

use crate::config::{Config, ConfigLoader, env_config_with};
use crate::error::AppResult;
use crate::logger::init_logger;

/// Resolve the process configuration using the CLI's config directory
///
/// The result is cached for the rest of the process.
pub fn load_config(cli: &Cli) -> AppResult<Arc<Config>> {
    let loader = ConfigLoader::from_process().with_config_dir(&cli.config_dir);
    Ok(env_config_with(&loader)?)
}

/// Install the global logger from the resolved configuration
pub fn init_logger_from_config(config: &Config) -> AppResult<()> {
    init_logger(config.logger(), config.env())?;
    Ok(())
}
