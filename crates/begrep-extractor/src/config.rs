//! Configuration for the Extractor

use crate::error::ExtractorError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Configuration for field extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Pattern a contact email must match; others are dropped with a warning
    pub email_pattern: String,

    /// Pattern a contact telephone number must match
    pub telephone_pattern: String,

    /// Treat an extended definition without audience as the general definition
    pub untargeted_definition_is_general: bool,

    /// Resources typed with this class are extracted by bulk import
    pub concept_type: String,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        Regex::new(&self.email_pattern).map_err(|e| format!("email_pattern: {}", e))?;
        Regex::new(&self.telephone_pattern).map_err(|e| format!("telephone_pattern: {}", e))?;
        if self.concept_type.trim().is_empty() {
            return Err("concept_type cannot be empty".to_string());
        }
        Ok(())
    }

    /// Compile the contact patterns
    pub fn contact_patterns(&self) -> Result<(Regex, Regex), ExtractorError> {
        let email =
            Regex::new(&self.email_pattern).map_err(|e| ExtractorError::Config(e.to_string()))?;
        let telephone = Regex::new(&self.telephone_pattern)
            .map_err(|e| ExtractorError::Config(e.to_string()))?;
        Ok((email, telephone))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            email_pattern: r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$".to_string(),
            telephone_pattern: r"^\+?[0-9][0-9 ]{4,19}$".to_string(),
            untargeted_definition_is_general: true,
            concept_type: crate::vocab::skos::CONCEPT.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: ASCII-only email, international telephone numbers only
    pub fn strict() -> Self {
        Self {
            email_pattern: r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$".to_string(),
            telephone_pattern: r"^\+[0-9]{7,15}$".to_string(),
            ..Self::default()
        }
    }

    /// Lenient preset: anything with an `@`, any number with separators
    pub fn lenient() -> Self {
        Self {
            email_pattern: r"^[^@\s]+@[^@\s]+$".to_string(),
            telephone_pattern: r"^\+?[0-9][0-9 ()-]{2,24}$".to_string(),
            ..Self::default()
        }
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
