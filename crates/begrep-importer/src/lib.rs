//! Begrep Importer
//!
//! Two-phase import of SKOS-AP-NO concepts from Turtle.
//!
//! # Overview
//!
//! An import job is created for a catalog, then its graph is processed into
//! one [`ExtractionRecord`](begrep_domain::ExtractionRecord) per concept
//! resource. Nothing is written until a user confirms the job after reviewing
//! the records; confirmation saves each record as a concept version and
//! aggregates the outcome into the job status.
//!
//! | Status | Reached by |
//! |--------|------------|
//! | `InProgress` | `create` |
//! | `PendingConfirmation` | `process` with at least one concept and no errors |
//! | `Failed` | `process` with a parse error, no concepts or any error; `confirm` saving nothing |
//! | `Completed` / `PartiallyCompleted` | `confirm` saving all / some records |
//! | `Cancelled` | `cancel` before confirmation |
//!
//! # Usage
//!
//! ```
//! use begrep_domain::{ImportStatus, Role, RoleTable};
//! use begrep_extractor::{ExtractorConfig, ResourceExtractor};
//! use begrep_importer::{ImportConfig, ImportJobs};
//! use begrep_store::SqliteStore;
//! use std::sync::{Arc, Mutex};
//!
//! let store = Arc::new(Mutex::new(SqliteStore::in_memory().unwrap()));
//! let roles = Arc::new(RoleTable::new().grant("alice", "910244132", Role::Write));
//! let jobs = ImportJobs::new(
//!     store,
//!     roles,
//!     ResourceExtractor::new(ExtractorConfig::default()).unwrap(),
//!     ImportConfig::synchronous(),
//! )
//! .unwrap();
//!
//! let job = jobs.create("alice", "910244132").unwrap();
//! let ttl = r#"
//!     @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
//!     <https://example.org/c/1> a skos:Concept ; skos:prefLabel "bil"@nb .
//! "#;
//! let job = jobs.process_turtle(job.id, ttl).unwrap();
//! assert_eq!(job.status, ImportStatus::PendingConfirmation);
//!
//! let job = jobs.confirm("alice", job.id).unwrap();
//! assert_eq!(job.status, ImportStatus::Completed);
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [import]
//! max_concurrent_imports = 4
//! synchronous = false
//! max_resources_per_import = 10000
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod jobs;
mod worker;

pub use config::ImportConfig;
pub use error::ImportError;
pub use jobs::ImportJobs;
pub use worker::ImportWorker;
