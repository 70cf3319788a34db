//! Begrep Catalog
//!
//! Services that own the concept lineage rules.
//!
//! # Overview
//!
//! - [`ConceptService`]: create, read, patch, publish, revise and delete
//!   concept versions, plus single-resource RDF re-extraction
//! - [`ChangeRequestService`]: propose, review and accept changes, with a
//!   compensating rollback when the concept write fails
//! - [`versioning`]: latest-by-SemVer and revision creation
//!
//! # Lineage rules
//!
//! - A lineage is every version sharing an `original_id`
//! - At most one version per lineage is unpublished
//! - A revision copies the latest published version, bumps the patch
//!   number and starts again as an unpublished draft
//! - `published` and `publishedAt` are only ever set by [`ConceptService::publish`]
//!
//! # Example
//!
//! ```
//! use begrep_catalog::ConceptService;
//! use begrep_domain::{JsonPatchOperation, Role, RoleTable};
//! use begrep_extractor::{ExtractorConfig, ResourceExtractor};
//! use begrep_gatekeeper::Gatekeeper;
//! use begrep_store::SqliteStore;
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let store = Arc::new(Mutex::new(SqliteStore::in_memory().unwrap()));
//! let roles = Arc::new(RoleTable::new().grant("alice", "910244132", Role::Admin));
//! let service = ConceptService::new(
//!     store,
//!     roles,
//!     Gatekeeper::default_config().unwrap(),
//!     ResourceExtractor::new(ExtractorConfig::default()).unwrap(),
//! );
//!
//! let concept = service.create("alice", "910244132", &[]).unwrap();
//! let ops = vec![
//!     JsonPatchOperation::add("/preferredTerm", json!({"nb": "bil"})),
//!     JsonPatchOperation::add("/definition", json!({"text": {"nb": "kjøretøy"}})),
//! ];
//! service.patch("alice", concept.id, &ops).unwrap();
//!
//! let published = service.publish("alice", concept.id).unwrap();
//! assert!(published.published);
//! ```

#![warn(missing_docs)]

mod change_requests;
mod concepts;
mod error;
pub mod versioning;

pub use change_requests::ChangeRequestService;
pub use concepts::ConceptService;
pub use error::CatalogError;
