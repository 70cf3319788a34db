//! In-memory RDF graph model
//!
//! Terms are always expanded (no prefixes). The graph is indexed by subject,
//! which is the only access path extraction needs: start at a typed resource
//! and walk its outgoing statements, following blank nodes.

use std::collections::BTreeMap;
use std::fmt;

/// An RDF literal: lexical form plus optional language tag or datatype
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    value: String,
    language: Option<String>,
    datatype: Option<String>,
}

impl Literal {
    /// A plain literal without language tag
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// A language-tagged literal; the tag is stored lowercased
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into().to_lowercase()),
            datatype: None,
        }
    }

    /// A typed literal
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// Lexical form
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Language tag, if any
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Datatype IRI, if explicitly typed
    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }
}

/// A node or value in the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// Named node
    Iri(String),
    /// Blank node, by label (without `_:`)
    Blank(String),
    /// Literal
    Literal(Literal),
}

impl Term {
    /// Named node
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Blank node
    pub fn blank(label: impl Into<String>) -> Self {
        Term::Blank(label.into())
    }

    /// Language-tagged literal
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal(Literal::tagged(value, language))
    }

    /// Plain literal
    pub fn plain(value: impl Into<String>) -> Self {
        Term::Literal(Literal::plain(value))
    }

    /// The IRI, if this is a named node
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// The literal, if this is one
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Whether this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// IRI or lexical form; blank node label for blank nodes
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri,
            Term::Blank(label) => label,
            Term::Literal(literal) => literal.value(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(literal) => {
                write!(f, "\"{}\"", literal.value)?;
                if let Some(lang) = &literal.language {
                    write!(f, "@{}", lang)?;
                } else if let Some(dt) = &literal.datatype {
                    write!(f, "^^<{}>", dt)?;
                }
                Ok(())
            }
        }
    }
}

/// Set of triples indexed by subject
#[derive(Debug, Clone, Default)]
pub struct Graph {
    by_subject: BTreeMap<Term, Vec<(String, Term)>>,
    len: usize,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triple; duplicates are ignored
    pub fn insert(&mut self, subject: Term, predicate: impl Into<String>, object: Term) {
        let predicate = predicate.into();
        let statements = self.by_subject.entry(subject).or_default();
        if !statements
            .iter()
            .any(|(p, o)| *p == predicate && *o == object)
        {
            statements.push((predicate, object));
            self.len += 1;
        }
    }

    /// Number of distinct triples
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the graph has no triples
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View of a node's outgoing statements
    pub fn resource<'g>(&'g self, node: &'g Term) -> Resource<'g> {
        Resource { graph: self, node }
    }

    /// Named resources with `rdf:type` `type_iri`, in IRI order
    pub fn resources_of_type<'g>(&'g self, type_iri: &str) -> Vec<Resource<'g>> {
        self.by_subject
            .keys()
            .filter(|subject| subject.as_iri().is_some())
            .map(|subject| self.resource(subject))
            .filter(|resource| resource.has_type(type_iri))
            .collect()
    }

    fn statements(&self, node: &Term) -> &[(String, Term)] {
        self.by_subject.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A node together with the graph it lives in
#[derive(Debug, Clone, Copy)]
pub struct Resource<'g> {
    graph: &'g Graph,
    node: &'g Term,
}

impl<'g> Resource<'g> {
    /// The node itself
    pub fn node(&self) -> &'g Term {
        self.node
    }

    /// IRI of the node, if named
    pub fn iri(&self) -> Option<&'g str> {
        self.node.as_iri()
    }

    /// Objects of `predicate`, in insertion order
    pub fn objects<'a>(&self, predicate: &'a str) -> impl Iterator<Item = &'g Term> + 'a
    where
        'g: 'a,
    {
        let graph: &'g Graph = self.graph;
        graph
            .statements(self.node)
            .iter()
            .filter(move |(p, _)| p == predicate)
            .map(|(_, o)| o)
    }

    /// First object of `predicate`
    pub fn object(&self, predicate: &str) -> Option<&'g Term> {
        self.objects(predicate).next()
    }

    /// Whether the node has at least one `predicate` statement
    pub fn has(&self, predicate: &str) -> bool {
        self.object(predicate).is_some()
    }

    /// Whether the node is typed with `type_iri`
    pub fn has_type(&self, type_iri: &str) -> bool {
        self.graph
            .statements(self.node)
            .iter()
            .any(|(p, o)| p == crate::vocab::rdf::TYPE && o.as_iri() == Some(type_iri))
    }

    /// Follow an object to its own statements
    pub fn follow(&self, node: &'g Term) -> Resource<'g> {
        self.graph.resource(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{rdf, skos};

    fn sample() -> Graph {
        let mut graph = Graph::new();
        let concept = Term::iri("https://example.org/concept/1");
        graph.insert(concept.clone(), rdf::TYPE, Term::iri(skos::CONCEPT));
        graph.insert(concept.clone(), skos::PREF_LABEL, Term::lang("bil", "nb"));
        graph.insert(concept.clone(), skos::PREF_LABEL, Term::lang("car", "EN"));
        graph.insert(concept, skos::PREF_LABEL, Term::lang("bil", "nb"));
        graph.insert(Term::blank("b0"), rdf::TYPE, Term::iri(skos::CONCEPT));
        graph
    }

    #[test]
    fn test_duplicates_ignored() {
        assert_eq!(sample().len(), 4);
    }

    #[test]
    fn test_resources_of_type_skips_blank_nodes() {
        let graph = sample();
        let resources = graph.resources_of_type(skos::CONCEPT);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].iri(), Some("https://example.org/concept/1"));
    }

    #[test]
    fn test_objects() {
        let graph = sample();
        let node = Term::iri("https://example.org/concept/1");
        let resource = graph.resource(&node);
        let labels: Vec<_> = resource
            .objects(skos::PREF_LABEL)
            .filter_map(Term::as_literal)
            .map(|l| (l.value(), l.language()))
            .collect();
        assert_eq!(labels, vec![("bil", Some("nb")), ("car", Some("en"))]);
        assert!(!resource.has(skos::ALT_LABEL));
    }

    #[test]
    fn test_blank_objects_keep_insertion_order() {
        let mut graph = Graph::new();
        let concept = Term::iri("https://example.org/concept/1");
        for label in ["z9", "a1", "m5"] {
            graph.insert(concept.clone(), "https://example.org/p", Term::blank(label));
        }
        let resource = graph.resource(&concept);
        let labels: Vec<_> = resource.objects("https://example.org/p").map(Term::lexical).collect();
        assert_eq!(labels, vec!["z9", "a1", "m5"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Term::lang("bil", "nb").to_string(), "\"bil\"@nb");
        assert_eq!(Term::iri("urn:x").to_string(), "<urn:x>");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
    }
}
