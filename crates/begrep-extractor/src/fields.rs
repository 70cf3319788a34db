//! Field extractors
//!
//! Each extractor reads one semantic field from a resource and returns the
//! value (if any) together with its diagnostics. Extractors never fail and
//! never look at each other's results, so a broken field cannot stop the
//! rest of the resource from being read.
//!
//! Issue messages start with the local name of the predicate involved
//! (`prefLabel: ...`, `versionInfo: ...`).

use crate::graph::{Resource, Term};
use crate::vocab::{self, dcat, dct, euvoc, owl, rdf, rdfs, skos, skosno, vcard};
use begrep_domain::{
    ConceptRelation, ConceptStatus, ContactPoint, Definition, Issue, LocalizedList,
    LocalizedText, RelationDirection, RelationKind, SemVer, Source, SourceDescription,
    ValueRange,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static ABSOLUTE_URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]+$"#).expect("absolute URI pattern")
});

fn is_absolute_uri(s: &str) -> bool {
    ABSOLUTE_URI.is_match(s)
}

/// Value of one field plus the issues raised while reading it
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    /// Extracted value; `None` when absent or unusable
    pub value: Option<T>,
    /// Diagnostics
    pub issues: Vec<Issue>,
}

impl<T> Extracted<T> {
    fn new(value: Option<T>, issues: Vec<Issue>) -> Self {
        Self { value, issues }
    }

    fn empty() -> Self {
        Self::new(None, Vec::new())
    }

    /// Whether any issue is an error
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(Issue::is_error)
    }
}

/// Compiled validation rules for contact points
#[derive(Debug, Clone)]
pub struct ContactRules {
    email: Regex,
    telephone: Regex,
}

impl ContactRules {
    /// Rules from compiled patterns
    pub fn new(email: Regex, telephone: Regex) -> Self {
        Self { email, telephone }
    }
}

fn name(predicate: &str) -> &str {
    vocab::local_name(predicate)
}

/// Localized text map: one text per language tag
///
/// Literals without a language tag are dropped; a single error names the
/// predicate and the dropped texts. When a language occurs twice the first
/// literal wins.
pub fn localized_text(resource: &Resource<'_>, predicate: &str) -> Extracted<LocalizedText> {
    let mut map = LocalizedText::new();
    let mut untagged = Vec::new();

    for literal in resource.objects(predicate).filter_map(Term::as_literal) {
        match literal.language() {
            Some(lang) => {
                map.entry(lang.to_string())
                    .or_insert_with(|| literal.value().to_string());
            }
            None => untagged.push(literal.value()),
        }
    }

    let issues = untagged_issue(predicate, &untagged).into_iter().collect();
    Extracted::new((!map.is_empty()).then_some(map), issues)
}

/// Localized list map: all texts per language tag, in document order
pub fn localized_list(resource: &Resource<'_>, predicate: &str) -> Extracted<LocalizedList> {
    let mut map = LocalizedList::new();
    let mut untagged = Vec::new();

    for literal in resource.objects(predicate).filter_map(Term::as_literal) {
        match literal.language() {
            Some(lang) => map
                .entry(lang.to_string())
                .or_default()
                .push(literal.value().to_string()),
            None => untagged.push(literal.value()),
        }
    }

    let issues = untagged_issue(predicate, &untagged).into_iter().collect();
    Extracted::new((!map.is_empty()).then_some(map), issues)
}

fn untagged_issue(predicate: &str, texts: &[&str]) -> Option<Issue> {
    if texts.is_empty() {
        return None;
    }
    let quoted: Vec<String> = texts.iter().map(|t| format!("\"{}\"", t)).collect();
    Some(Issue::error(format!(
        "{}: literal without language tag is not allowed: {}",
        name(predicate),
        quoted.join(", ")
    )))
}

/// Which definition field an extended definition populates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// No audience given
    General,
    /// `audience-type#public`
    Public,
    /// `audience-type#specialist`
    Specialist,
}

impl Audience {
    fn of(node: &Resource<'_>) -> Option<Self> {
        match node.object(dct::AUDIENCE) {
            None => Some(Audience::General),
            Some(term) => match term.lexical() {
                vocab::audience::PUBLIC => Some(Audience::Public),
                vocab::audience::SPECIALIST => Some(Audience::Specialist),
                _ => None,
            },
        }
    }
}

/// Definition for one audience
///
/// Selects the first `euvoc:xlDefinition` node whose audience matches, then
/// reads its text, source relationship and sources independently. A node
/// with an unknown audience is ignored with a warning, reported only on the
/// general definition so it appears once per resource.
pub fn definition(resource: &Resource<'_>, audience: Audience) -> Extracted<Definition> {
    let mut issues = Vec::new();
    let mut selected = None;

    for term in resource.objects(euvoc::XL_DEFINITION) {
        let node = resource.follow(term);
        match Audience::of(&node) {
            Some(found) if found == audience => {
                selected = Some(node);
                break;
            }
            None if audience == Audience::General => issues.push(Issue::warning(format!(
                "{}: unknown audience {}, definition ignored",
                name(dct::AUDIENCE),
                node.object(dct::AUDIENCE).map(Term::lexical).unwrap_or_default()
            ))),
            _ => {}
        }
    }

    let Some(node) = selected else {
        return Extracted::new(None, issues);
    };

    let text = localized_text(&node, rdf::VALUE);
    issues.extend(text.issues);

    let relationship = match node.object(skosno::RELATIONSHIP_WITH_SOURCE) {
        None => None,
        Some(term) => match vocab::RELATIONSHIPS_WITH_SOURCE.get(term.lexical()) {
            Some(relationship) => Some(*relationship),
            None => {
                issues.push(Issue::warning(format!(
                    "{}: unknown value {}",
                    name(skosno::RELATIONSHIP_WITH_SOURCE),
                    term.lexical()
                )));
                None
            }
        },
    };

    let sources = sources(&node, &mut issues);

    let source_description = (relationship.is_some() || !sources.is_empty()).then(|| {
        SourceDescription {
            relationship_with_source: relationship,
            sources,
        }
    });
    let text = text.value.unwrap_or_default();

    if text.is_empty() && source_description.is_none() {
        return Extracted::new(None, issues);
    }
    Extracted::new(
        Some(Definition {
            text,
            source_description,
        }),
        issues,
    )
}

fn sources(node: &Resource<'_>, issues: &mut Vec<Issue>) -> Vec<Source> {
    let mut sources = Vec::new();
    for term in node.objects(dct::SOURCE) {
        match term {
            Term::Iri(iri) => sources.push(Source::uri(iri.as_str())),
            Term::Literal(literal) if is_absolute_uri(literal.value()) => {
                sources.push(Source::uri(literal.value()))
            }
            Term::Literal(literal) => sources.push(Source::text(literal.value())),
            Term::Blank(_) => {
                let source = node.follow(term);
                if let Some(label) = source.object(rdfs::LABEL).and_then(Term::as_literal) {
                    sources.push(Source::text(label.value()));
                } else if let Some(Term::Iri(iri)) = source.object(rdfs::SEE_ALSO) {
                    sources.push(Source::uri(iri.as_str()));
                } else {
                    issues.push(Issue::warning(format!(
                        "{}: source without label or link ignored",
                        name(dct::SOURCE)
                    )));
                }
            }
        }
    }
    sources
}

/// Typed relations: associative, partitive and generic
///
/// A relation node without a target concept is dropped silently.
pub fn relations(resource: &Resource<'_>) -> Extracted<Vec<ConceptRelation>> {
    let mut relations = Vec::new();
    let mut issues = Vec::new();

    for term in resource.objects(skosno::IS_FROM_CONCEPT_IN) {
        let node = resource.follow(term);
        let Some(target) = node.object(skosno::HAS_TO_CONCEPT).and_then(Term::as_iri) else {
            continue;
        };
        let description = localized_text(&node, skosno::RELATION_ROLE);
        issues.extend(description.issues);
        relations.push(ConceptRelation {
            kind: RelationKind::Associative,
            direction: None,
            description: description.value,
            related_concept: target.to_string(),
        });
    }

    let shaped = [
        (
            RelationKind::Partitive,
            skosno::HAS_PARTITIVE_RELATION,
            dct::DESCRIPTION,
            [
                (skosno::HAS_PARTITIVE_CONCEPT, RelationDirection::HasPart),
                (skosno::HAS_COMPREHENSIVE_CONCEPT, RelationDirection::IsPartOf),
            ],
        ),
        (
            RelationKind::Generic,
            skosno::HAS_GENERIC_RELATION,
            skosno::CHARACTERISTIC_OF_DIVISION,
            [
                (skosno::HAS_SPECIFIC_CONCEPT, RelationDirection::Generalizes),
                (skosno::HAS_GENERIC_CONCEPT, RelationDirection::Specializes),
            ],
        ),
    ];

    for (kind, via, description_predicate, directions) in shaped {
        for term in resource.objects(via) {
            let node = resource.follow(term);
            let Some((direction, target)) = directions.iter().find_map(|(predicate, direction)| {
                node.object(predicate)
                    .and_then(Term::as_iri)
                    .map(|target| (*direction, target))
            }) else {
                continue;
            };
            let description = localized_text(&node, description_predicate);
            issues.extend(description.issues);
            relations.push(ConceptRelation {
                kind,
                direction: Some(direction),
                description: description.value,
                related_concept: target.to_string(),
            });
        }
    }

    Extracted::new((!relations.is_empty()).then_some(relations), issues)
}

/// Semantic version from `owl:versionInfo`
pub fn version(resource: &Resource<'_>) -> Extracted<SemVer> {
    let Some(term) = resource.object(owl::VERSION_INFO) else {
        return Extracted::empty();
    };
    let raw = term.lexical();
    match SemVer::parse(raw) {
        Ok(version) => Extracted::new(Some(version), Vec::new()),
        Err(_) => Extracted::new(
            None,
            vec![Issue::error(format!(
                "{}: \"{}\" is not a valid version, expected major.minor.patch",
                name(owl::VERSION_INFO),
                raw
            ))],
        ),
    }
}

/// Calendar date (`YYYY-MM-DD`)
pub fn date(resource: &Resource<'_>, predicate: &str) -> Extracted<NaiveDate> {
    let Some(term) = resource.object(predicate) else {
        return Extracted::empty();
    };
    let raw = term.lexical();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Extracted::new(Some(date), Vec::new()),
        Err(_) => Extracted::new(
            None,
            vec![Issue::error(format!(
                "{}: \"{}\" is not a valid date",
                name(predicate),
                raw
            ))],
        ),
    }
}

/// Contact point with validated email and telephone
///
/// Invalid values are dropped with a warning. The contact point is only
/// returned if at least one value survives.
pub fn contact_point(resource: &Resource<'_>, rules: &ContactRules) -> Extracted<ContactPoint> {
    let Some(term) = resource.object(dcat::CONTACT_POINT) else {
        return Extracted::empty();
    };
    let node = resource.follow(term);
    let mut issues = Vec::new();

    let mut checked = |predicate: &str, scheme: &str, pattern: &Regex, what: &str| {
        let raw = node.object(predicate).map(Term::lexical)?;
        let value = raw.strip_prefix(scheme).unwrap_or(raw).trim();
        if pattern.is_match(value) {
            Some(value.to_string())
        } else {
            issues.push(Issue::warning(format!(
                "{}: \"{}\" is not a valid {}, value dropped",
                name(predicate),
                raw,
                what
            )));
            None
        }
    };

    let contact = ContactPoint {
        email: checked(vcard::HAS_EMAIL, "mailto:", &rules.email, "email address"),
        telephone: checked(vcard::HAS_TELEPHONE, "tel:", &rules.telephone, "telephone number"),
    };

    Extracted::new((!contact.is_empty()).then_some(contact), issues)
}

/// List of URIs
///
/// Named nodes are taken as is; literals must look like absolute URIs. Any
/// invalid value leaves the whole field empty.
pub fn uri_list(resource: &Resource<'_>, predicate: &str) -> Extracted<Vec<String>> {
    let mut uris = Vec::new();
    let mut issues = Vec::new();

    for term in resource.objects(predicate) {
        match term {
            Term::Iri(iri) => uris.push(iri.clone()),
            Term::Literal(literal) if is_absolute_uri(literal.value()) => {
                uris.push(literal.value().to_string())
            }
            other => issues.push(Issue::error(format!(
                "{}: \"{}\" is not a valid URI",
                name(predicate),
                other.lexical()
            ))),
        }
    }

    if !issues.is_empty() || uris.is_empty() {
        return Extracted::new(None, issues);
    }
    Extracted::new(Some(uris), issues)
}

/// Subject area: literals become localized text, IRIs become codes
pub fn subject(resource: &Resource<'_>) -> (Extracted<LocalizedList>, Extracted<Vec<String>>) {
    let texts = localized_list(resource, dct::SUBJECT);
    let codes: Vec<String> = resource
        .objects(dct::SUBJECT)
        .filter_map(Term::as_iri)
        .map(str::to_string)
        .collect();
    (texts, Extracted::new((!codes.is_empty()).then_some(codes), Vec::new()))
}

/// Value range: literal descriptions and at most one link
pub fn value_range(resource: &Resource<'_>) -> Extracted<ValueRange> {
    let description = localized_text(resource, skosno::VALUE_RANGE);
    let uri = resource
        .objects(skosno::VALUE_RANGE)
        .find_map(Term::as_iri)
        .map(str::to_string);

    let range = ValueRange {
        description: description.value.unwrap_or_default(),
        uri,
    };
    let present = !range.description.is_empty() || range.uri.is_some();
    Extracted::new(present.then_some(range), description.issues)
}

/// First literal of a predicate, regardless of language
pub fn plain_text(resource: &Resource<'_>, predicate: &str) -> Extracted<String> {
    let value = resource
        .objects(predicate)
        .find_map(Term::as_literal)
        .map(|literal| literal.value().to_string());
    Extracted::new(value, Vec::new())
}

/// Editorial status from the EU concept-status authority table
pub fn status(resource: &Resource<'_>) -> Extracted<ConceptStatus> {
    let Some(term) = resource.object(euvoc::STATUS) else {
        return Extracted::empty();
    };
    match vocab::CONCEPT_STATUSES.get(term.lexical()) {
        Some(status) => Extracted::new(Some(*status), Vec::new()),
        None => Extracted::new(
            None,
            vec![Issue::warning(format!(
                "{}: unknown concept status {}",
                name(euvoc::STATUS),
                term.lexical()
            ))],
        ),
    }
}

/// Every extracted field of one resource
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct ExtractedFields {
    pub preferred_term: Extracted<LocalizedText>,
    pub alternative_terms: Extracted<LocalizedList>,
    pub hidden_terms: Extracted<LocalizedList>,
    pub definition: Extracted<Definition>,
    pub definition_for_public: Extracted<Definition>,
    pub definition_for_specialists: Extracted<Definition>,
    pub notes: Extracted<LocalizedText>,
    pub examples: Extracted<LocalizedText>,
    pub subject: Extracted<LocalizedList>,
    pub subject_codes: Extracted<Vec<String>>,
    pub value_range: Extracted<ValueRange>,
    pub contact_point: Extracted<ContactPoint>,
    pub valid_from: Extracted<NaiveDate>,
    pub valid_to: Extracted<NaiveDate>,
    pub see_also: Extracted<Vec<String>>,
    pub replaced_by: Extracted<Vec<String>>,
    pub abbreviated_label: Extracted<String>,
    pub relations: Extracted<Vec<ConceptRelation>>,
    pub sem_ver: Extracted<SemVer>,
    pub status: Extracted<ConceptStatus>,
}

impl ExtractedFields {
    /// Run every field extractor over `resource`
    pub fn extract(resource: &Resource<'_>, rules: &ContactRules, general_definition: bool) -> Self {
        let (subject, subject_codes) = subject(resource);
        Self {
            preferred_term: localized_text(resource, skos::PREF_LABEL),
            alternative_terms: localized_list(resource, skos::ALT_LABEL),
            hidden_terms: localized_list(resource, skos::HIDDEN_LABEL),
            definition: if general_definition {
                definition(resource, Audience::General)
            } else {
                Extracted::empty()
            },
            definition_for_public: definition(resource, Audience::Public),
            definition_for_specialists: definition(resource, Audience::Specialist),
            notes: localized_text(resource, skos::SCOPE_NOTE),
            examples: localized_text(resource, skos::EXAMPLE),
            subject,
            subject_codes,
            value_range: value_range(resource),
            contact_point: contact_point(resource, rules),
            valid_from: date(resource, euvoc::START_DATE),
            valid_to: date(resource, euvoc::END_DATE),
            see_also: uri_list(resource, rdfs::SEE_ALSO),
            replaced_by: uri_list(resource, dct::IS_REPLACED_BY),
            abbreviated_label: plain_text(resource, skosno::ABBREVIATED_LABEL),
            relations: relations(resource),
            sem_ver: version(resource),
            status: status(resource),
        }
    }

    /// All issues, in field order
    pub fn issues(&self) -> Vec<Issue> {
        [
            &self.preferred_term.issues,
            &self.alternative_terms.issues,
            &self.hidden_terms.issues,
            &self.definition.issues,
            &self.definition_for_public.issues,
            &self.definition_for_specialists.issues,
            &self.notes.issues,
            &self.examples.issues,
            &self.subject.issues,
            &self.subject_codes.issues,
            &self.value_range.issues,
            &self.contact_point.issues,
            &self.valid_from.issues,
            &self.valid_to.issues,
            &self.see_also.issues,
            &self.replaced_by.issues,
            &self.abbreviated_label.issues,
            &self.relations.issues,
            &self.sem_ver.issues,
            &self.status.issues,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}
