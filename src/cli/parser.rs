//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::build;
use crate::config::files::DEFAULT_CONFIG_DIR;

/// Service bootstrap: configuration, logging and database lifecycle
#[derive(Parser, Debug)]
#[command(name = "svc-bootstrap")]
#[command(about = "Service bootstrap: configuration, logging and database lifecycle")]
#[command(long_about = "
svc-bootstrap resolves the service configuration from the process environment,
config/<env>.json and config/<env>.secret.json, installs the JSON logger and
runs the database lifecycle commands a deployment needs.

EXAMPLES:
    # Check the database connection and wait for a shutdown signal
    svc-bootstrap run

    # Apply pending migrations
    svc-bootstrap migrate

    # Drop and re-create the development database, then migrate
    svc-bootstrap reset

    # Block until the primary accepts connections, at most 30 probes
    svc-bootstrap wait --max-attempts 30

    # Print the resolved configuration with the password masked
    svc-bootstrap config

    # Use configuration files from another directory
    svc-bootstrap --config-dir /etc/svc/config migrate
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the static configuration files
    ///
    /// `<env>.json` and `<env>.secret.json` are looked up here. A missing
    /// directory means no static configuration, but the path must not be
    /// a regular file.
    ///
    /// Example: --config-dir /etc/svc/config
    #[arg(
        short,
        long,
        value_name = "DIR",
        default_value = DEFAULT_CONFIG_DIR,
        value_parser = super::validation::validate_config_dir
    )]
    pub config_dir: PathBuf,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check the database and wait for shutdown (default)
    ///
    /// Opens the connection pool, runs `SELECT 1` and then waits for Ctrl+C
    /// or SIGTERM, giving the pool the graceful shutdown timeout to drain.
    Run,

    /// Apply pending database migrations
    Migrate,

    /// Reset the database according to DB_RESET_MODE, then migrate
    ///
    /// `recreate` drops and re-creates the database, `drop_tables` drops
    /// every table in the public schema. Refused when the mode is `none`.
    Reset,

    /// Create the configured database if it does not exist
    CreateDb,

    /// Drop the configured database
    ///
    /// Refused when DB_RESET_MODE is `none`.
    DropDb,

    /// Wait until the database accepts connections
    ///
    /// Probes every second with `SELECT pg_is_in_recovery()`.
    ///
    /// Examples:
    ///   svc-bootstrap wait                     # Wait forever for a primary
    ///   svc-bootstrap wait --allow-replica     # A hot standby is good enough
    ///   svc-bootstrap wait --max-attempts 10   # Give up after 10 probes
    Wait {
        /// Accept a read-only replica as ready
        #[arg(long)]
        allow_replica: bool,

        /// Give up after this many probes
        #[arg(long, value_name = "N", value_parser = super::validation::validate_max_attempts)]
        max_attempts: Option<u32>,
    },

    /// Print the resolved configuration as JSON
    ///
    /// The database password is masked.
    Config,
}

impl Cli {
    /// The command to run, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
