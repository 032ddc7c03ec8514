//! svc-bootstrap library
//!
//! Configuration resolution, JSON logging and PostgreSQL lifecycle
//! utilities for service startup.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod schema;

pub use config::{Config, env_config};

pub fn pkg_name() -> &'static str {
    build::PROJECT_NAME
}

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
