//! Error types for import jobs

use begrep_domain::ErrorCategory;
use begrep_extractor::ExtractorError;
use thiserror::Error;

/// Errors that can occur while running an import job
#[derive(Error, Debug)]
pub enum ImportError {
    /// No job with the given id
    #[error("Import job not found: {0}")]
    NotFound(String),

    /// The principal lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The job is in the wrong state for the requested transition
    #[error("Invalid job state: {0}")]
    InvalidState(String),

    /// The uploaded RDF could not be read
    #[error("Upstream error: {0}")]
    Upstream(#[from] ExtractorError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Unexpected fault, including processing a job that is no longer in progress
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImportError {
    /// How the error should be reported to the caller
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::NotFound(_) => ErrorCategory::NotFound,
            ImportError::Forbidden(_) => ErrorCategory::Forbidden,
            ImportError::InvalidState(_) => ErrorCategory::Conflict,
            ImportError::Upstream(e) if e.is_client_error() => ErrorCategory::BadRequest,
            ImportError::Upstream(_)
            | ImportError::Store(_)
            | ImportError::Internal(_)
            | ImportError::Config(_) => ErrorCategory::Internal,
        }
    }
}

/// Wrap a store error
pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> ImportError {
    ImportError::Store(e.to_string())
}
