//! Begrep Patch Engine
//!
//! Structural diff and RFC 6902 application over serialized concepts.
//!
//! ## Guarantees
//!
//! - `apply(x, diff(x, y))` reproduces `y` for any two concepts
//! - `diff(x, x)` is empty
//! - An operation list either applies completely or not at all
//! - A [`PathPolicy`] rejects the whole list if any operation touches a
//!   protected pointer, before anything is applied
//!
//! ## Example
//!
//! ```
//! use begrep_domain::Concept;
//! use begrep_patch::{apply, diff, PathPolicy};
//!
//! let original = Concept::new_lineage("910244132");
//! let mut updated = original.clone();
//! updated.notes.insert("nb".into(), "Brukes i statistikk".into());
//!
//! let ops = diff(&original, &updated).unwrap();
//! let patched = apply(&original, &ops, &PathPolicy::concept_patch()).unwrap();
//! assert_eq!(patched, updated);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod apply;
mod diff;
mod error;
mod fields;
mod pointer;
mod policy;

pub use apply::{apply, apply_to_value};
pub use diff::{diff, diff_documents};
pub use error::PatchError;
pub use fields::{ConceptField, FieldKind};
pub use pointer::{escape, JsonPointer};
pub use policy::PathPolicy;
