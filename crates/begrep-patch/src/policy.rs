//! Protected-path rules checked before any operation is applied

use crate::fields::ConceptField;
use crate::{JsonPointer, PatchError};
use begrep_domain::{JsonPatchOperation, OpKind};

/// Which pointers a patch may touch, and whether it may be empty
///
/// A protected pointer also covers its descendants and its ancestors:
/// replacing `/history` or the whole document would rewrite
/// `/history/changeElement` just as surely as targeting it directly.
#[derive(Debug, Clone)]
pub struct PathPolicy {
    protected: Vec<JsonPointer>,
    require_operations: bool,
}

impl PathPolicy {
    /// No restrictions; used by import and internal bookkeeping of new documents
    pub fn unrestricted() -> Self {
        Self {
            protected: Vec::new(),
            require_operations: false,
        }
    }

    /// Fields no caller may ever patch: identity, lineage, audit, ownership, publishing
    pub fn base_protected() -> Vec<JsonPointer> {
        [
            ConceptField::Id,
            ConceptField::OriginalId,
            ConceptField::PreviousVersionId,
            ConceptField::History,
            ConceptField::Organization,
            ConceptField::Published,
            ConceptField::PublishedAt,
        ]
        .iter()
        .map(ConceptField::pointer)
        .collect()
    }

    /// Policy for client patches of a concept version
    pub fn concept_patch() -> Self {
        Self {
            protected: Self::base_protected(),
            require_operations: true,
        }
    }

    /// Policy for operations produced by RDF import
    pub fn import() -> Self {
        Self {
            protected: Self::base_protected(),
            require_operations: false,
        }
    }

    /// Policy for change request operations; status belongs to the version manager
    pub fn change_request() -> Self {
        let mut protected = Self::base_protected();
        protected.push(ConceptField::Status.pointer());
        Self {
            protected,
            require_operations: true,
        }
    }

    /// Check a whole operation list; any violation rejects the list
    pub fn check(&self, operations: &[JsonPatchOperation]) -> Result<(), PatchError> {
        if self.require_operations && operations.is_empty() {
            return Err(PatchError::EmptyOperations);
        }

        for operation in operations {
            let path = JsonPointer::parse(&operation.path)?;
            self.check_pointer(&path, &operation.path)?;

            if matches!(operation.op, OpKind::Move | OpKind::Copy) {
                let from = operation
                    .from
                    .as_deref()
                    .ok_or_else(|| PatchError::MissingFrom(operation.path.clone()))?;
                self.check_pointer(&JsonPointer::parse(from)?, from)?;
            }
        }
        Ok(())
    }

    fn check_pointer(&self, pointer: &JsonPointer, raw: &str) -> Result<(), PatchError> {
        if self.protected.iter().any(|p| p.overlaps(pointer)) {
            return Err(PatchError::ProtectedPath(raw.to_string()));
        }
        Ok(())
    }
}
