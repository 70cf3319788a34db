//! Concept module - the versioned unit of the catalog
//!
//! A concept version serializes to a camelCase JSON document. Empty maps,
//! empty lists and absent optionals are omitted from the document, so every
//! value has exactly one serialized form; the patch engine relies on this to
//! make `diff` and `apply` exact inverses.

use crate::{ConceptId, ConceptStatus, JsonPatchOperation, SemVer};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text keyed by language tag (`nb`, `nn`, `en`, ...)
pub type LocalizedText = BTreeMap<String, String>;

/// Several texts per language tag
pub type LocalizedList = BTreeMap<String, Vec<String>>;

/// Organization owning a concept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Organization {
    /// Organization number
    pub id: String,
}

/// How a definition relates to its sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipWithSource {
    /// Written by the organization itself
    SelfComposed,
    /// Quoted directly from the source
    DirectFromSource,
    /// Derived from the source
    DerivedFromSource,
}

/// One source reference of a definition: literal text or a URI, never both
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    /// Free-text reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Link to the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl Source {
    /// A free-text source
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            uri: None,
        }
    }

    /// A linked source
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            text: None,
            uri: Some(uri.into()),
        }
    }
}

/// Where a definition comes from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescription {
    /// Relationship between definition and sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_with_source: Option<RelationshipWithSource>,
    /// Source references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

/// A definition for one audience
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Definition text per language
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub text: LocalizedText,
    /// Source information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_description: Option<SourceDescription>,
}

/// Value range (scope) of a concept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueRange {
    /// Description per language
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LocalizedText,
    /// Link to a code list or other value range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Contact point for questions about a concept
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactPoint {
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Telephone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl ContactPoint {
    /// Whether neither email nor telephone is set
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.telephone.is_none()
    }
}

/// Shape of a typed relation to another concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// Associative relation with a free-text role
    Associative,
    /// Part/whole relation
    Partitive,
    /// Generic/specific relation
    Generic,
}

/// Direction of a partitive or generic relation, seen from this concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationDirection {
    /// The related concept is a part of this one
    HasPart,
    /// This concept is a part of the related one
    IsPartOf,
    /// The related concept is more specific than this one
    Generalizes,
    /// The related concept is more general than this one
    Specializes,
}

/// Typed relation to another concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRelation {
    /// Relation shape
    pub kind: RelationKind,
    /// Direction (partitive and generic only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<RelationDirection>,
    /// Role or division criterion per language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedText>,
    /// URI of the related concept
    pub related_concept: String,
}

/// One audited change to a concept version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeElement {
    /// When the change was applied
    pub at: DateTime<Utc>,
    /// Who applied it
    pub by: String,
    /// The operations that were applied
    pub operations: Vec<JsonPatchOperation>,
}

/// Audit trail of a concept version
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    /// When the version was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Who created it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Applied changes, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_element: Vec<ChangeElement>,
}

/// One version of a concept
///
/// Identity is `original_id` (shared by every version of the lineage) plus
/// `id` (unique per version).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Version id
    pub id: ConceptId,

    /// Lineage id
    pub original_id: ConceptId,

    /// Version this one was revised from; `None` for the first version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version_id: Option<ConceptId>,

    /// Semantic version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sem_ver: Option<SemVer>,

    /// Editorial status
    #[serde(default)]
    pub status: ConceptStatus,

    /// Set only by the publish operation
    #[serde(default)]
    pub published: bool,

    /// Set only by the publish operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    /// Owning organization
    #[serde(default)]
    pub organization: Organization,

    /// Audit trail
    #[serde(default)]
    pub history: History,

    /// Preferred term (`skos:prefLabel`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub preferred_term: LocalizedText,

    /// Admitted terms (`skos:altLabel`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alternative_terms: LocalizedList,

    /// Deprecated terms (`skos:hiddenLabel`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hidden_terms: LocalizedList,

    /// General definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Definition>,

    /// Definition for the general public
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_for_public: Option<Definition>,

    /// Definition for specialists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition_for_specialists: Option<Definition>,

    /// Notes (`skos:scopeNote`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub notes: LocalizedText,

    /// Examples (`skos:example`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: LocalizedText,

    /// Subject area as free text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subject: LocalizedList,

    /// Subject area as codes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subject_codes: Vec<String>,

    /// Value range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,

    /// Contact point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_point: Option<ContactPoint>,

    /// Start of the validity period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<NaiveDate>,

    /// End of the validity period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,

    /// Related resources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,

    /// Concepts replacing this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replaced_by: Vec<String>,

    /// Abbreviation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviated_label: Option<String>,

    /// Typed relations to other concepts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<ConceptRelation>,

    /// Editor currently responsible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user: Option<String>,

    /// Organization-internal fields
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub internal_fields: BTreeMap<String, String>,
}

impl Concept {
    /// Create the first version of a new lineage
    ///
    /// The version starts as an unpublished draft at `0.1.0`.
    pub fn new_lineage(organization_id: impl Into<String>) -> Self {
        let id = ConceptId::new();
        Self::new_version(id, id, organization_id)
    }

    /// Create an empty version with explicit identity
    pub fn new_version(
        id: ConceptId,
        original_id: ConceptId,
        organization_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            original_id,
            previous_version_id: None,
            sem_ver: Some(SemVer::initial()),
            status: ConceptStatus::Draft,
            published: false,
            published_at: None,
            organization: Organization {
                id: organization_id.into(),
            },
            history: History::default(),
            preferred_term: LocalizedText::new(),
            alternative_terms: LocalizedList::new(),
            hidden_terms: LocalizedList::new(),
            definition: None,
            definition_for_public: None,
            definition_for_specialists: None,
            notes: LocalizedText::new(),
            examples: LocalizedText::new(),
            subject: LocalizedList::new(),
            subject_codes: Vec::new(),
            value_range: None,
            contact_point: None,
            valid_from: None,
            valid_to: None,
            see_also: Vec::new(),
            replaced_by: Vec::new(),
            abbreviated_label: None,
            relations: Vec::new(),
            assigned_user: None,
            internal_fields: BTreeMap::new(),
        }
    }

    /// Organization id shortcut
    pub fn organization_id(&self) -> &str {
        &self.organization.id
    }
}
