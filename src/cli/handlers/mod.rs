//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.

pub mod config;
pub mod database;
pub mod migrate;
pub mod run;
pub mod wait;

pub use config::ConfigCommandHandler;
pub use database::DatabaseCommandHandler;
pub use migrate::MigrateCommandHandler;
pub use run::RunCommandHandler;
pub use wait::WaitCommandHandler;
