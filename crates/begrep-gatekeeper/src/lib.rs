//! Begrep Gatekeeper
//!
//! Decides whether a concept version may be published.
//!
//! The Gatekeeper checks:
//! - Preferred term present (optionally in required languages)
//! - Definition present
//! - Owning organization id well formed
//! - Validity period ordered
//! - Version above every published version of the lineage (needs a store)
//!
//! # Examples
//!
//! ```
//! use begrep_domain::Concept;
//! use begrep_gatekeeper::{Gatekeeper, ValidationStatus};
//!
//! let gatekeeper = Gatekeeper::default_config().unwrap();
//! let concept = Concept::new_lineage("910244132");
//!
//! let result = gatekeeper.validate(&concept);
//! assert_eq!(result.status, ValidationStatus::Rejected);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
