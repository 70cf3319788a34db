//! Error types for the patch engine

use thiserror::Error;

/// Errors raised while validating or applying a patch
///
/// Everything except `Serialization` is a fault in the caller's data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    /// An operation touches a field no caller may patch
    #[error("Path is protected: {0}")]
    ProtectedPath(String),

    /// A pointer is not a valid JSON pointer
    #[error("Invalid JSON pointer: {0}")]
    InvalidPointer(String),

    /// The target of remove, replace or test does not exist
    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    /// The source of move or copy does not exist
    #[error("From path does not exist: {0}")]
    FromNotFound(String),

    /// A move or copy operation lacks `from`
    #[error("Operation on {0} requires a from path")]
    MissingFrom(String),

    /// A value cannot be moved into one of its own children
    #[error("Cannot move {from} into its own child {path}")]
    MoveIntoChild {
        /// Source pointer
        from: String,
        /// Target pointer
        path: String,
    },

    /// A test operation did not match
    #[error("Test failed at {0}")]
    TestFailed(String),

    /// The operation list was empty where operations are required
    #[error("Patch contains no operations")]
    EmptyOperations,

    /// The patched document no longer matches the concept schema
    #[error("Patched document is not a valid concept: {0}")]
    Schema(String),

    /// The concept could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PatchError {
    /// Whether the caller's data caused the error
    pub fn is_client_error(&self) -> bool {
        !matches!(self, PatchError::Serialization(_))
    }
}
