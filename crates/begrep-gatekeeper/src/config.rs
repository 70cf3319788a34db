//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for publish validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Require a preferred term in at least one language
    pub require_preferred_term: bool,

    /// Require a definition with text in at least one language
    pub require_definition: bool,

    /// Languages the preferred term must exist in, on top of the above
    pub required_languages: Vec<String>,

    /// Check the owning organization id against `organization_id_pattern`
    pub validate_organization_id: bool,

    /// Pattern for organization ids (Norwegian organization number)
    pub organization_id_pattern: String,

    /// Require `validFrom <= validTo` when both are set
    pub validate_validity_period: bool,

    /// Require the version to be above every published version of the lineage
    pub validate_version_order: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_preferred_term: true,
            require_definition: true,
            required_languages: Vec::new(),
            validate_organization_id: true,
            organization_id_pattern: r"^[0-9]{9}$".to_string(),
            validate_validity_period: true,
            validate_version_order: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (structural checks only)
    pub fn permissive() -> Self {
        Self {
            require_definition: false,
            validate_organization_id: false,
            validate_version_order: false,
            ..Self::default()
        }
    }

    /// Create a strict configuration (Bokmål preferred term required)
    pub fn strict() -> Self {
        Self {
            required_languages: vec!["nb".to_string()],
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        regex::Regex::new(&self.organization_id_pattern)
            .map_err(|e| format!("organization_id_pattern: {}", e))?;
        if self.required_languages.iter().any(|l| l.trim().is_empty()) {
            return Err("required_languages cannot contain empty tags".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
