//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog operation failed
    #[error(transparent)]
    Catalog(#[from] begrep_catalog::CatalogError),

    /// Import operation failed
    #[error(transparent)]
    Import(#[from] begrep_importer::ImportError),

    /// Database could not be opened
    #[error("Database error: {0}")]
    Store(#[from] begrep_store::StoreError),

    /// Extractor could not be built
    #[error("Extractor error: {0}")]
    Extractor(#[from] begrep_extractor::ExtractorError),

    /// Gatekeeper could not be built
    #[error("Validation setup error: {0}")]
    Gatekeeper(#[from] begrep_gatekeeper::GatekeeperError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        use begrep_domain::ErrorCategory;

        let category = match self {
            CliError::Catalog(e) => e.category(),
            CliError::Import(e) => e.category(),
            CliError::InvalidInput(_) => ErrorCategory::BadRequest,
            CliError::Config(_) | CliError::Toml(_) => return 78,
            _ => ErrorCategory::Internal,
        };
        match category {
            ErrorCategory::BadRequest => 2,
            ErrorCategory::Forbidden => 3,
            ErrorCategory::NotFound => 4,
            ErrorCategory::Conflict => 5,
            ErrorCategory::Internal => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use begrep_catalog::CatalogError;
    use begrep_importer::ImportError;

    #[test]
    fn test_exit_codes_follow_category() {
        assert_eq!(CliError::Catalog(CatalogError::NotFound("x".into())).exit_code(), 4);
        assert_eq!(CliError::Import(ImportError::InvalidState("x".into())).exit_code(), 5);
        assert_eq!(CliError::InvalidInput("x".into()).exit_code(), 2);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
    }
}
