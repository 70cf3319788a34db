//! Begrep Domain Layer
//!
//! This crate contains the data model of the concept catalog and the trait
//! interfaces that all other layers depend upon. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Concept**: one version of a term/definition record owned by an organization
//! - **Lineage**: all versions sharing an `original_id`
//! - **SemVer**: `major.minor.patch`, ordered lexicographically
//! - **Issue**: a warning or error produced by RDF field extraction
//! - **JsonPatchOperation**: RFC 6902 operation against a serialized concept
//! - **ImportResult / ExtractionRecord**: read models of an import job
//! - **ChangeRequest**: a reviewable list of operations
//!
//! ## Architecture
//!
//! - Serialization (`serde`) defines the JSON document every patch points into
//! - Trait definitions for persistence and authorization
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod access;
pub mod change_request;
pub mod concept;
pub mod error;
pub mod ids;
pub mod import;
pub mod issue;
pub mod patch_operation;
pub mod semver;
pub mod status;
pub mod traits;

// Re-exports for convenience
pub use access::{Role, RoleTable};
pub use change_request::{ChangeRequest, ChangeRequestStatus};
pub use concept::{
    ChangeElement, Concept, ConceptRelation, ContactPoint, Definition, History, LocalizedList,
    LocalizedText, Organization, RelationDirection, RelationKind, RelationshipWithSource, Source,
    SourceDescription, ValueRange,
};
pub use error::ErrorCategory;
pub use ids::{ChangeRequestId, ConceptId, ImportId};
pub use import::{
    ExtractResult, ExtractionRecord, ImportCounts, ImportResult, ImportStatus, SaveFailure,
};
pub use issue::{Issue, IssueSeverity};
pub use patch_operation::{JsonPatchOperation, OpKind};
pub use semver::SemVer;
pub use status::ConceptStatus;
