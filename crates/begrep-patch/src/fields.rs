//! Field table of the concept document
//!
//! Diffing and path protection are driven by this enumeration rather than by
//! ad hoc pointer strings.

use crate::JsonPointer;

/// How a top-level field is compared by [`diff`](crate::diff)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Replaced as a whole when it differs
    Scalar,
    /// Object keyed by language or sub-field name; compared key by key
    Keyed,
    /// List; replaced as a whole when any element differs
    List,
}

/// Top-level fields of a serialized concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ConceptField {
    Id,
    OriginalId,
    PreviousVersionId,
    SemVer,
    Status,
    Published,
    PublishedAt,
    Organization,
    History,
    PreferredTerm,
    AlternativeTerms,
    HiddenTerms,
    Definition,
    DefinitionForPublic,
    DefinitionForSpecialists,
    Notes,
    Examples,
    Subject,
    SubjectCodes,
    ValueRange,
    ContactPoint,
    ValidFrom,
    ValidTo,
    SeeAlso,
    ReplacedBy,
    AbbreviatedLabel,
    Relations,
    AssignedUser,
    InternalFields,
}

impl ConceptField {
    /// Every field, in document order
    pub const ALL: [ConceptField; 29] = [
        ConceptField::Id,
        ConceptField::OriginalId,
        ConceptField::PreviousVersionId,
        ConceptField::SemVer,
        ConceptField::Status,
        ConceptField::Published,
        ConceptField::PublishedAt,
        ConceptField::Organization,
        ConceptField::History,
        ConceptField::PreferredTerm,
        ConceptField::AlternativeTerms,
        ConceptField::HiddenTerms,
        ConceptField::Definition,
        ConceptField::DefinitionForPublic,
        ConceptField::DefinitionForSpecialists,
        ConceptField::Notes,
        ConceptField::Examples,
        ConceptField::Subject,
        ConceptField::SubjectCodes,
        ConceptField::ValueRange,
        ConceptField::ContactPoint,
        ConceptField::ValidFrom,
        ConceptField::ValidTo,
        ConceptField::SeeAlso,
        ConceptField::ReplacedBy,
        ConceptField::AbbreviatedLabel,
        ConceptField::Relations,
        ConceptField::AssignedUser,
        ConceptField::InternalFields,
    ];

    /// JSON member name
    pub fn key(&self) -> &'static str {
        match self {
            ConceptField::Id => "id",
            ConceptField::OriginalId => "originalId",
            ConceptField::PreviousVersionId => "previousVersionId",
            ConceptField::SemVer => "semVer",
            ConceptField::Status => "status",
            ConceptField::Published => "published",
            ConceptField::PublishedAt => "publishedAt",
            ConceptField::Organization => "organization",
            ConceptField::History => "history",
            ConceptField::PreferredTerm => "preferredTerm",
            ConceptField::AlternativeTerms => "alternativeTerms",
            ConceptField::HiddenTerms => "hiddenTerms",
            ConceptField::Definition => "definition",
            ConceptField::DefinitionForPublic => "definitionForPublic",
            ConceptField::DefinitionForSpecialists => "definitionForSpecialists",
            ConceptField::Notes => "notes",
            ConceptField::Examples => "examples",
            ConceptField::Subject => "subject",
            ConceptField::SubjectCodes => "subjectCodes",
            ConceptField::ValueRange => "valueRange",
            ConceptField::ContactPoint => "contactPoint",
            ConceptField::ValidFrom => "validFrom",
            ConceptField::ValidTo => "validTo",
            ConceptField::SeeAlso => "seeAlso",
            ConceptField::ReplacedBy => "replacedBy",
            ConceptField::AbbreviatedLabel => "abbreviatedLabel",
            ConceptField::Relations => "relations",
            ConceptField::AssignedUser => "assignedUser",
            ConceptField::InternalFields => "internalFields",
        }
    }

    /// Look up a field by JSON member name
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Comparison kind
    pub fn kind(&self) -> FieldKind {
        match self {
            ConceptField::SemVer
            | ConceptField::Organization
            | ConceptField::History
            | ConceptField::PreferredTerm
            | ConceptField::AlternativeTerms
            | ConceptField::HiddenTerms
            | ConceptField::Definition
            | ConceptField::DefinitionForPublic
            | ConceptField::DefinitionForSpecialists
            | ConceptField::Notes
            | ConceptField::Examples
            | ConceptField::Subject
            | ConceptField::ValueRange
            | ConceptField::ContactPoint
            | ConceptField::InternalFields => FieldKind::Keyed,
            ConceptField::SubjectCodes
            | ConceptField::SeeAlso
            | ConceptField::ReplacedBy
            | ConceptField::Relations => FieldKind::List,
            _ => FieldKind::Scalar,
        }
    }

    /// Pointer to the field
    pub fn pointer(&self) -> JsonPointer {
        JsonPointer::from_tokens([self.key()])
    }

    /// Pointer to the field as a string (`/key`)
    pub fn path(&self) -> String {
        format!("/{}", self.key())
    }
}
