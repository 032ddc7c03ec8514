//! Process-wide configuration cache
//!
//! Only the bootstrap layer touches the cache. Everything else receives the
//! resolved `Arc<Config>` from its caller.

use std::sync::{Arc, OnceLock};

use crate::config::error::ConfigError;
use crate::config::loader::ConfigLoader;
use crate::config::settings::Config;

/// One-shot holder for a resolved configuration
///
/// Two threads racing on the first access may both run the pipeline; the
/// first stored value wins and both receive it.
#[derive(Debug, Default)]
pub struct ConfigCache {
    cell: OnceLock<Arc<Config>>,
}

impl ConfigCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Cached configuration, resolving it with `loader` on first access
    pub fn get_or_load(&self, loader: &ConfigLoader) -> Result<Arc<Config>, ConfigError> {
        if let Some(config) = self.cell.get() {
            return Ok(Arc::clone(config));
        }

        let config = Arc::new(loader.load()?);
        // Losing a race drops our value in favor of the stored one
        Ok(Arc::clone(self.cell.get_or_init(|| config)))
    }

    /// Cached configuration, if already resolved
    pub fn get(&self) -> Option<Arc<Config>> {
        self.cell.get().cloned()
    }
}

static PROCESS_CONFIG: ConfigCache = ConfigCache::new();

/// Process configuration, resolved from the live environment on first call
pub fn env_config() -> Result<Arc<Config>, ConfigError> {
    PROCESS_CONFIG.get_or_load(&ConfigLoader::from_process())
}

/// Process configuration resolved with an explicit loader on first call
///
/// Later calls return the cached value and ignore `loader`.
pub fn env_config_with(loader: &ConfigLoader) -> Result<Arc<Config>, ConfigError> {
    PROCESS_CONFIG.get_or_load(loader)
}
