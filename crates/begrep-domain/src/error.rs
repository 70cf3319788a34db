//! Response categories shared by the service layers

use serde::{Deserialize, Serialize};

/// How an error should be reported to a caller
///
/// Service errors expose `category()` so an outer API layer can map them to
/// status codes without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The caller sent data that cannot be applied
    BadRequest,
    /// The caller lacks the required role
    Forbidden,
    /// The addressed entity does not exist
    NotFound,
    /// The entity is in the wrong state for the request
    Conflict,
    /// Anything the caller cannot fix
    Internal,
}

impl ErrorCategory {
    /// Conventional HTTP status code for the category
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::BadRequest => 400,
            ErrorCategory::Forbidden => 403,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Internal => 500,
        }
    }
}
