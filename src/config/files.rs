//! Static per-environment JSON files
//!
//! Each file under the config directory is a flat JSON object whose entries
//! act as an environment overlay: `config/<env>.json` is version-controlled,
//! `config/<env>.secret.json` is kept out of version control.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::env::EnvMap;
use crate::config::error::ConfigError;

/// Default configuration directory, relative to the working directory
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Suffix appended to the environment tag for the secret overlay
const SECRET_SUFFIX: &str = ".secret";

/// Directory holding the static config files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticConfigDir {
    dir: PathBuf,
}

impl StaticConfigDir {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing the given tag
    pub fn file_for(&self, tag: &str) -> PathBuf {
        self.dir.join(format!("{}.json", tag))
    }

    /// Load `<tag>.json`
    ///
    /// A missing file yields an empty map. A file that exists but cannot be
    /// read or parsed is a [`ConfigError::Load`] naming the path.
    pub fn load(&self, tag: &str) -> Result<EnvMap, ConfigError> {
        let path = self.file_for(tag);
        if !path.exists() {
            return Ok(EnvMap::new());
        }
        load_file(&path)
    }

    /// Load the secret overlay `<tag>.secret.json`
    pub fn load_secret(&self, tag: &str) -> Result<EnvMap, ConfigError> {
        self.load(&format!("{}{}", tag, SECRET_SUFFIX))
    }
}

impl Default for StaticConfigDir {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}

fn load_file(path: &Path) -> Result<EnvMap, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::load(path, e.to_string()))?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| ConfigError::load(path, e.to_string()))?;

    let Value::Object(entries) = value else {
        return Err(ConfigError::load(path, "expected a JSON object at the top level"));
    };

    let mut env = EnvMap::new();
    for (key, value) in entries {
        let text = match value {
            // null behaves like an absent key
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ConfigError::load(
                    path,
                    format!("value of \"{}\" must be a string, number or boolean", key),
                ));
            }
        };
        env.insert(key, text);
    }

    Ok(env)
}
