//! Configuration for import jobs

use serde::{Deserialize, Serialize};

/// Configuration for the import worker
///
/// # Examples
///
/// ```
/// use begrep_importer::ImportConfig;
///
/// let config = ImportConfig::default();
/// assert_eq!(config.max_concurrent_imports, 4);
/// assert!(!config.synchronous);
///
/// let config = ImportConfig::synchronous();
/// assert!(config.synchronous);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Imports processed at the same time
    pub max_concurrent_imports: usize,

    /// Process imports inline instead of on background tasks
    pub synchronous: bool,

    /// Graphs with more concept resources than this fail
    pub max_resources_per_import: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_concurrent_imports: 4,
            synchronous: false,
            max_resources_per_import: 10_000,
        }
    }
}

impl ImportConfig {
    /// Inline processing, as used by tests and the CLI
    pub fn synchronous() -> Self {
        Self {
            synchronous: true,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_imports == 0 {
            return Err("max_concurrent_imports must be > 0".to_string());
        }
        if self.max_concurrent_imports > u32::MAX as usize {
            return Err("max_concurrent_imports is too large".to_string());
        }
        if self.max_resources_per_import == 0 {
            return Err("max_resources_per_import must be > 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize TOML: {}", e))
    }
}
