use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

pub const CORE_CONFIG_FILENAME: &str = "storefront.json";
pub const CORE_CONFIG_VERSION: &str = "1.0.0";

/// Tunables for the filter/navigation core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub version: String,
    /// Quiet window for coalescing listing fetches, in milliseconds.
    pub debounce_ms: u64,
    /// Page size requested from the listing service.
    pub page_size: u32,
    /// Maximum number of resolved slugs kept in the resolver cache.
    pub slug_cache_capacity: u32,
    /// Time-to-live for resolver cache entries, in seconds.
    pub slug_cache_ttl_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CORE_CONFIG_VERSION.to_string(),
            debounce_ms: 300,
            page_size: 24,
            slug_cache_capacity: 256,
            slug_cache_ttl_secs: 300,
        }
    }
}

impl CoreConfig {
    /// Load the config from `dir`, writing the defaults there first if no
    /// file exists yet.
    pub fn load_or_create(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(CORE_CONFIG_FILENAME);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|error| CoreError::Internal(format!("read config: {error}")))?;
            serde_json::from_str(&raw)
                .map_err(|error| CoreError::Internal(format!("parse config: {error}")))
        } else {
            let config = Self::default();
            let raw = serde_json::to_string_pretty(&config)
                .map_err(|error| CoreError::Internal(format!("serialize config: {error}")))?;
            std::fs::write(&path, raw)
                .map_err(|error| CoreError::Internal(format!("write config: {error}")))?;
            Ok(config)
        }
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
