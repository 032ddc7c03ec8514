//! Configuration loader
//!
//! Runs the resolution pipeline over an environment snapshot:
//! static file, secret overlay, dotenv, merge, validation and build.

use std::path::PathBuf;

use crate::config::env::{
    self, DEFAULT_ENV, DEFAULT_TEST_ENV, DOTENV_FILE, EnvMap, default_overlay, fill_missing,
    load_dotenv, merge_env, resolve_env_tag,
};
use crate::config::environment::NodeEnv;
use crate::config::error::ConfigError;
use crate::config::files::StaticConfigDir;
use crate::config::overrides::ConfigPatch;
use crate::config::schema::validate_env;
use crate::config::settings::Config;

/// Configuration loader working on a snapshot of the environment
///
/// The snapshot is taken once; later changes to the process environment
/// are not observed, and the loader never writes to it.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directory holding `<tag>.json` and `<tag>.secret.json`
    config_dir: StaticConfigDir,
    /// Dotenv file consulted outside test mode
    dotenv_path: PathBuf,
    /// Live environment snapshot, highest precedence
    live: EnvMap,
}

impl ConfigLoader {
    /// Loader over the current process environment
    pub fn from_process() -> Self {
        Self::with_env(env::process_env())
    }

    /// Loader over an explicit environment snapshot
    pub fn with_env(live: EnvMap) -> Self {
        Self {
            config_dir: StaticConfigDir::default(),
            dotenv_path: PathBuf::from(DOTENV_FILE),
            live,
        }
    }

    /// Override the static config directory
    pub fn with_config_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config_dir = StaticConfigDir::new(dir);
        self
    }

    /// Override the dotenv file location
    pub fn with_dotenv_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dotenv_path = path.into();
        self
    }

    pub fn config_dir(&self) -> &StaticConfigDir {
        &self.config_dir
    }

    /// Environment tag the regular pipeline resolves from the snapshot
    pub fn env_tag(&self) -> String {
        resolve_env_tag(&self.live, DEFAULT_ENV)
    }

    /// Build the effective environment map without validating it
    pub fn effective_env(&self) -> Result<EnvMap, ConfigError> {
        let env_tag = self.env_tag();
        let static_env = self.config_dir.load(&env_tag)?;
        let secret = self.config_dir.load_secret(&env_tag)?;

        let mut live = self.live.clone();
        if !is_test_mode(&static_env) {
            load_dotenv(&mut live, &self.dotenv_path)?;
        }

        Ok(merge_env(&live, &default_overlay(&env_tag), &secret, &static_env))
    }

    /// Resolve, validate and build the configuration
    pub fn load(&self) -> Result<Config, ConfigError> {
        let effective = self.effective_env()?;
        Config::from_validated(validate_env(&effective)?)
    }

    /// Resolve a configuration for test harnesses
    ///
    /// Only `<tag>.json` fills the snapshot, with `tag` defaulting to `test`.
    /// When that file does not put the runtime mode into test, `test.json`
    /// is used instead. No secret overlay, dotenv file or default overlay
    /// takes part.
    pub fn load_test(&self, overrides: Option<ConfigPatch>) -> Result<Config, ConfigError> {
        let env_tag = resolve_env_tag(&self.live, DEFAULT_TEST_ENV);

        let mut effective = self.live.clone();
        fill_missing(&mut effective, &self.config_dir.load(&env_tag)?);

        if !is_test_mode(&effective) {
            effective = self.live.clone();
            fill_missing(&mut effective, &self.config_dir.load(DEFAULT_TEST_ENV)?);
        }

        let config = Config::from_validated(validate_env(&effective)?)?;
        match overrides {
            Some(patch) => config.with_overrides(patch),
            None => Ok(config),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_process()
    }
}

fn is_test_mode(env: &EnvMap) -> bool {
    env.get(NodeEnv::ENV_VAR).map(String::as_str) == Some(NodeEnv::Test.as_str())
}
