//! Error types for the catalog services

use begrep_domain::ErrorCategory;
use begrep_extractor::ExtractorError;
use begrep_patch::PatchError;
use thiserror::Error;

/// Errors returned by the concept and change request services
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The addressed concept or change request does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request cannot be applied as given
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The entity is in the wrong state for the transition
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The principal lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A patch was rejected or failed to apply
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Reading RDF for re-extraction failed
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Publish validation rejected the concept
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),
}

impl CatalogError {
    /// How the error should be reported to the caller
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::NotFound(_) => ErrorCategory::NotFound,
            CatalogError::BadRequest(_) | CatalogError::Validation(_) => ErrorCategory::BadRequest,
            CatalogError::Conflict(_) => ErrorCategory::Conflict,
            CatalogError::Forbidden(_) => ErrorCategory::Forbidden,
            CatalogError::Patch(e) if e.is_client_error() => ErrorCategory::BadRequest,
            CatalogError::Extractor(e) if e.is_client_error() => ErrorCategory::BadRequest,
            CatalogError::Patch(_) | CatalogError::Extractor(_) | CatalogError::Store(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Wrap a store error
pub(crate) fn store_error<E: std::fmt::Display>(e: E) -> CatalogError {
    CatalogError::Store(e.to_string())
}
