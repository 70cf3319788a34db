//! Error types for the Extractor
//!
//! Field-level problems are never errors here: they are recorded as
//! [`Issue`](begrep_domain::Issue)s. These variants cover the input graph
//! itself and the diff step of replacement mode.

use begrep_patch::PatchError;
use thiserror::Error;

/// Errors that can occur while reading RDF or building an extraction record
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The Turtle document is syntactically invalid
    #[error("Invalid Turtle: {0}")]
    Syntax(String),

    /// Reading the input failed
    #[error("I/O error while reading RDF: {0}")]
    Io(#[from] std::io::Error),

    /// The base IRI given to the parser is invalid
    #[error("Invalid base IRI: {0}")]
    BaseIri(String),

    /// Diffing the candidate against the original failed
    #[error("Patch error: {0}")]
    Patch(#[from] PatchError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Whether the caller supplied bad input, as opposed to an unexpected fault
    pub fn is_client_error(&self) -> bool {
        match self {
            ExtractorError::Syntax(_) | ExtractorError::BaseIri(_) => true,
            ExtractorError::Patch(e) => e.is_client_error(),
            ExtractorError::Io(_) | ExtractorError::Config(_) => false,
        }
    }
}
