//! Begrep Storage Layer
//!
//! Implements the concept, import job and change request store traits on
//! SQLite.
//!
//! # Architecture
//!
//! - Each entity is stored as its JSON document, so the stored form is the
//!   same document patches point into
//! - A few columns beside the document (lineage, organization, status)
//!   carry the filters the services query by
//!
//! # Examples
//!
//! ```
//! use begrep_domain::Concept;
//! use begrep_domain::traits::ConceptStore;
//! use begrep_store::SqliteStore;
//!
//! let mut store = SqliteStore::in_memory().unwrap();
//! let concept = Concept::new_lineage("910244132");
//! store.save_concept(&concept).unwrap();
//!
//! assert_eq!(store.get_concept(concept.id).unwrap(), Some(concept));
//! ```

#![warn(missing_docs)]

use begrep_domain::traits::{ChangeRequestStore, ConceptQuery, ConceptStore, ImportResultStore};
use begrep_domain::{
    ChangeRequest, ChangeRequestId, Concept, ConceptId, ExtractionRecord, ImportId, ImportResult,
};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of the store traits
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store between tasks by
/// wrapping it in a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database at the given path
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use begrep_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("begrep.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a fresh in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Serialized name of a unit enum variant (e.g. a status)
    fn variant_name<T: Serialize>(value: &T) -> Result<String, StoreError> {
        match serde_json::to_value(value)? {
            serde_json::Value::String(s) => Ok(s),
            other => Err(StoreError::InvalidData(format!(
                "Expected a string variant, got {}",
                other
            ))),
        }
    }

    fn decode<T: DeserializeOwned>(document: &str) -> Result<T, StoreError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Run a query returning one document column and decode each row
    fn documents<T: DeserializeOwned, P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        rows.iter().map(|doc| Self::decode(doc)).collect()
    }
}

impl ConceptStore for SqliteStore {
    type Error = StoreError;

    fn save_concept(&mut self, concept: &Concept) -> Result<(), Self::Error> {
        let document = serde_json::to_string(concept)?;
        self.conn.execute(
            "INSERT INTO concepts (id, original_id, organization_id, status, published, document)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
             original_id = excluded.original_id, organization_id = excluded.organization_id,
             status = excluded.status, published = excluded.published, document = excluded.document",
            params![
                concept.id.to_string(),
                concept.original_id.to_string(),
                concept.organization_id(),
                concept.status.as_str(),
                concept.published,
                document,
            ],
        )?;
        debug!("Saved concept {}", concept.id);
        Ok(())
    }

    fn get_concept(&self, id: ConceptId) -> Result<Option<Concept>, Self::Error> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM concepts WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        document.map(|d| Self::decode(&d)).transpose()
    }

    fn delete_concept(&mut self, id: ConceptId) -> Result<bool, Self::Error> {
        let deleted = self
            .conn
            .execute("DELETE FROM concepts WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    fn query_concepts(&self, query: &ConceptQuery) -> Result<Vec<Concept>, Self::Error> {
        let mut sql = String::from("SELECT document FROM concepts WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(organization_id) = &query.organization_id {
            sql.push_str(" AND organization_id = ?");
            params.push(Box::new(organization_id.clone()));
        }

        if let Some(original_id) = query.original_id {
            sql.push_str(" AND original_id = ?");
            params.push(Box::new(original_id.to_string()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(published) = query.published {
            sql.push_str(" AND published = ?");
            params.push(Box::new(published));
        }

        sql.push_str(" ORDER BY id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        self.documents(&sql, &param_refs[..])
    }
}

impl ImportResultStore for SqliteStore {
    type Error = StoreError;

    fn save_import_result(&mut self, result: &ImportResult) -> Result<(), Self::Error> {
        let document = serde_json::to_string(result)?;
        let status = Self::variant_name(&result.status)?;
        let id = result.id.to_string();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO import_results (id, catalog_id, status, created, document)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
             status = excluded.status, document = excluded.document",
            params![
                id,
                result.catalog_id,
                status,
                result.created.to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
                document,
            ],
        )?;

        // Keep the saved-record index in step with the job document
        tx.execute("DELETE FROM import_records WHERE import_id = ?1", params![id])?;
        if result.status.has_saved_concepts() {
            let mut stmt = tx.prepare(
                "INSERT INTO import_records (import_id, catalog_id, external_id, record)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in result
                .extraction_records
                .iter()
                .filter(|r| r.internal_id.is_some())
            {
                stmt.execute(params![
                    id,
                    result.catalog_id,
                    record.external_id,
                    serde_json::to_string(record)?,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Saved import job {} ({:?})", result.id, result.status);
        Ok(())
    }

    fn get_import_result(&self, id: ImportId) -> Result<Option<ImportResult>, Self::Error> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM import_results WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        document.map(|d| Self::decode(&d)).transpose()
    }

    fn list_import_results(&self, catalog_id: &str) -> Result<Vec<ImportResult>, Self::Error> {
        self.documents(
            "SELECT document FROM import_results WHERE catalog_id = ?1
             ORDER BY created DESC, id DESC",
            params![catalog_id],
        )
    }

    fn find_completed_record(
        &self,
        catalog_id: &str,
        external_id: &str,
    ) -> Result<Option<ExtractionRecord>, Self::Error> {
        let record: Option<String> = self
            .conn
            .query_row(
                "SELECT record FROM import_records
                 WHERE catalog_id = ?1 AND external_id = ?2
                 ORDER BY rowid DESC LIMIT 1",
                params![catalog_id, external_id],
                |row| row.get(0),
            )
            .optional()?;

        record.map(|r| Self::decode(&r)).transpose()
    }
}

impl ChangeRequestStore for SqliteStore {
    type Error = StoreError;

    fn save_change_request(&mut self, request: &ChangeRequest) -> Result<(), Self::Error> {
        let document = serde_json::to_string(request)?;
        self.conn.execute(
            "INSERT INTO change_requests (id, catalog_id, concept_id, status, document)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
             concept_id = excluded.concept_id, status = excluded.status,
             document = excluded.document",
            params![
                request.id.to_string(),
                request.catalog_id,
                request.concept_id.map(|id| id.to_string()),
                Self::variant_name(&request.status)?,
                document,
            ],
        )?;
        Ok(())
    }

    fn get_change_request(
        &self,
        id: ChangeRequestId,
    ) -> Result<Option<ChangeRequest>, Self::Error> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT document FROM change_requests WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        document.map(|d| Self::decode(&d)).transpose()
    }

    fn list_change_requests(&self, catalog_id: &str) -> Result<Vec<ChangeRequest>, Self::Error> {
        self.documents(
            "SELECT document FROM change_requests WHERE catalog_id = ?1 ORDER BY id",
            params![catalog_id],
        )
    }
}
