//! Local store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_CACHE_DIR, DEFAULT_SPECS_DIR, DEFAULT_SPEC_FRESHNESS_SECS};
use crate::store::{normalized, StoreLayout};

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_specs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SPECS_DIR)
}

fn default_spec_freshness_secs() -> u64 {
    DEFAULT_SPEC_FRESHNESS_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root for artifacts and every other non-index file
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Root for spec index files
    #[serde(default = "default_specs_dir")]
    pub specs_dir: PathBuf,
    /// Age at which a stored spec index is re-fetched (default: 84600)
    #[serde(default = "default_spec_freshness_secs")]
    pub spec_freshness_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            specs_dir: default_specs_dir(),
            spec_freshness_secs: default_spec_freshness_secs(),
        }
    }
}

impl StorageConfig {
    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(self.cache_dir.clone(), self.specs_dir.clone())
    }

    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.spec_freshness_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err("storage.cache_dir cannot be empty".to_string());
        }
        if self.specs_dir.as_os_str().is_empty() {
            return Err("storage.specs_dir cannot be empty".to_string());
        }
        let cache_dir = normalized(&self.cache_dir);
        let specs_dir = normalized(&self.specs_dir);
        if cache_dir == specs_dir {
            return Err(format!(
                "storage.cache_dir and storage.specs_dir must differ (both '{}')",
                self.cache_dir.display()
            ));
        }
        if cache_dir.starts_with(&specs_dir) || specs_dir.starts_with(&cache_dir) {
            return Err(format!(
                "storage.cache_dir '{}' and storage.specs_dir '{}' must not be nested",
                self.cache_dir.display(),
                self.specs_dir.display()
            ));
        }
        if self.spec_freshness_secs == 0 {
            return Err("storage.spec_freshness_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
