//! Command implementations.

pub mod concept;
pub mod import;
pub mod job;

pub use self::concept::execute_concept;
pub use self::import::execute_import;
pub use self::job::execute_job;

use crate::access::LocalAccess;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use begrep_catalog::ConceptService;
use begrep_extractor::ResourceExtractor;
use begrep_gatekeeper::Gatekeeper;
use begrep_importer::{ImportJobs, ImportWorker};
use begrep_store::SqliteStore;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// Services and settings shared by every command
pub struct Context {
    /// Concept versions and lineages
    pub concepts: ConceptService<SqliteStore, LocalAccess>,
    /// Import jobs, processed through the worker pool
    pub imports: ImportWorker<SqliteStore, LocalAccess>,
    /// Principal the commands act as
    pub principal: String,
    /// Loaded configuration
    pub config: Config,
    /// Output formatter
    pub formatter: Formatter,
}

impl Context {
    /// Open the configured database and wire the services over it
    pub fn open(config: Config, principal: String, formatter: Formatter) -> Result<Self> {
        if let Some(parent) = config.database.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Arc::new(Mutex::new(SqliteStore::new(&config.database)?));
        let access = Arc::new(LocalAccess::new(principal.clone(), config.role));

        let concepts = ConceptService::new(
            Arc::clone(&store),
            Arc::clone(&access),
            Gatekeeper::new(config.validation.clone())?,
            ResourceExtractor::new(config.extractor.clone())?,
        );
        let jobs = ImportJobs::new(
            store,
            access,
            ResourceExtractor::new(config.extractor.clone())?,
            config.import.clone(),
        )?;

        Ok(Self {
            concepts,
            imports: ImportWorker::new(Arc::new(jobs)),
            principal,
            config,
            formatter,
        })
    }
}

/// Parse a command-line id argument
pub(crate) fn parse_id<T: FromStr<Err = String>>(raw: &str) -> Result<T> {
    raw.trim().parse().map_err(CliError::InvalidInput)
}


#[cfg(test)]
mod tests {
    use super::*;
    use begrep_domain::ConceptId;

    #[test]
    fn test_parse_id() {
        let id = ConceptId::new();
        let parsed: ConceptId = parse_id(&format!(" {} ", id)).unwrap();
        assert_eq!(parsed, id);
        assert!(matches!(
            parse_id::<ConceptId>("nope"),
            Err(CliError::InvalidInput(_))
        ));
    }
}
