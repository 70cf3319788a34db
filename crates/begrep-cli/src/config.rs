//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use begrep_domain::Role;
use begrep_extractor::ExtractorConfig;
use begrep_gatekeeper::ValidationConfig;
use begrep_importer::ImportConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// ```toml
/// database = "/home/alice/.begrep/begrep.db"
/// catalog = "910244132"
/// principal = "alice"
/// role = "admin"
/// log_level = "info"
///
/// [settings]
/// color = true
/// format = "table"
///
/// [import]
/// synchronous = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,

    /// Catalog used when a command does not name one
    pub catalog: Option<String>,

    /// Principal the CLI acts as
    pub principal: String,

    /// Role granted to the principal in the catalogs it works on
    pub role: Role,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Output settings
    pub settings: Settings,

    /// Import job settings
    pub import: ImportConfig,

    /// Field extraction settings
    pub extractor: ExtractorConfig,

    /// Publish validation settings
    pub validation: ValidationConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".begrep"))
    }

    /// Load configuration from `path` (or the default path), falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        let config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path` (or the default path).
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if self.principal.trim().is_empty() {
            return Err(CliError::Config("principal cannot be empty".into()));
        }
        self.import
            .validate()
            .map_err(|e| CliError::Config(format!("[import] {}", e)))?;
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))?;
        self.validation
            .validate()
            .map_err(|e| CliError::Config(format!("[validation] {}", e)))?;
        Ok(())
    }

    /// The catalog a command works on: the explicit one, else the configured one.
    pub fn catalog_or(&self, explicit: Option<String>) -> Result<String> {
        explicit.or_else(|| self.catalog.clone()).ok_or_else(|| {
            CliError::InvalidInput(
                "No catalog given. Pass --catalog or set `catalog` in the config file".into(),
            )
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        let database = Self::home()
            .map(|home| home.join("begrep.db"))
            .unwrap_or_else(|_| PathBuf::from("begrep.db"));

        Self {
            database,
            catalog: None,
            principal: "local".to_string(),
            role: Role::Admin,
            log_level: "warn".to_string(),
            settings: Settings::default(),
            import: ImportConfig::synchronous(),
            extractor: ExtractorConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.principal, "local");
        assert_eq!(config.role, Role::Admin);
        assert!(config.settings.color);
        assert!(config.import.synchronous);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
                catalog = "910244132"
                principal = "alice"

                [settings]
                format = "json"

                [import]
                max_concurrent_imports = 2
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.catalog.as_deref(), Some("910244132"));
        assert_eq!(config.principal, "alice");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.import.max_concurrent_imports, 2);
        assert!(!config.import.synchronous);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            catalog: Some("910244132".to_string()),
            role: Role::Write,
            ..Config::default()
        };
        config.save(Some(&path)).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[import]\nmax_concurrent_imports = 0\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("[import]"));
    }

    #[test]
    fn test_catalog_resolution() {
        let config = Config {
            catalog: Some("910244132".to_string()),
            ..Config::default()
        };
        assert_eq!(config.catalog_or(None).unwrap(), "910244132");
        assert_eq!(config.catalog_or(Some("974760673".into())).unwrap(), "974760673");
        assert!(Config::default().catalog_or(None).is_err());
    }
}
