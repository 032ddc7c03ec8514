//! Configuration resolution for svc-bootstrap
//!
//! The effective environment is assembled from several layers, highest
//! precedence first:
//! 1. The live process environment
//! 2. Default overlay: `ENV` = resolved tag, `NODE_ENV` = `development`
//! 3. `config/<tag>.json` - version-controlled static file
//! 4. `config/<tag>.secret.json` - gitignored secret overlay
//!
//! Outside test mode a `.env` file fills gaps in the live layer. The result
//! is validated, built into an immutable [`Config`] and cached for the
//! lifetime of the process.

pub mod cache;
pub mod env;
pub mod environment;
pub mod error;
pub mod files;
pub mod loader;
pub mod overrides;
pub mod schema;
pub mod settings;

// Re-export public types
pub use cache::{ConfigCache, env_config, env_config_with};
pub use env::EnvMap;
pub use environment::NodeEnv;
pub use error::{ConfigError, FieldError, ValidationErrors};
pub use files::StaticConfigDir;
pub use loader::ConfigLoader;
pub use overrides::{ConfigPatch, DatabasePatch, LogFilePatch, LoggerPatch, SsePatch};
pub use schema::{ValidatedEnv, validate_env};
pub use settings::{Config, DatabaseConfig, LogFileSettings, LoggerSettings, SseSettings};
