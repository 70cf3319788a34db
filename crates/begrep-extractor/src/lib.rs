//! Begrep Extractor
//!
//! Reads SKOS-AP-NO concepts out of RDF graphs.
//!
//! # Overview
//!
//! Field extractors pull one semantic field at a time out of a resource and
//! report problems as [`Issue`](begrep_domain::Issue)s instead of failing.
//! The resource extractor combines them into an
//! [`ExtractionRecord`](begrep_domain::ExtractionRecord) per resource.
//!
//! # Architecture
//!
//! ```text
//! Turtle → Graph → Field extractors → ResourceExtractor → ExtractionRecord
//!                                         │
//!                                         └─ replacement mode: diff(original, candidate)
//! ```
//!
//! # Example Usage
//!
//! ```
//! use begrep_extractor::{parse_turtle_str, ExtractorConfig, ResourceExtractor};
//!
//! let ttl = r#"
//!     @prefix skos: <http://www.w3.org/2004/02/skos/core#> .
//!     <https://example.org/c/1> a skos:Concept ; skos:prefLabel "bil"@nb .
//! "#;
//!
//! let graph = parse_turtle_str(ttl).unwrap();
//! let extractor = ResourceExtractor::new(ExtractorConfig::default()).unwrap();
//! let records = extractor.extract_all(&graph);
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].external_id, "https://example.org/c/1");
//! assert_eq!(records[0].extract_result.operations.len(), 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod fields;
pub mod graph;
mod resource;
pub mod turtle;
pub mod vocab;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use fields::{Audience, ContactRules, Extracted, ExtractedFields};
pub use graph::{Graph, Literal, Resource, Term};
pub use resource::{ResourceExtractor, NO_CHANGES_DETECTED};
pub use turtle::{parse_turtle, parse_turtle_str};
