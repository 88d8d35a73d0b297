use std::collections::BTreeMap;

use thiserror::Error;

use super::repositories::TermGraph;
use super::value_objects::Curie;

/// An ontology term, identified by its CURIE, with an optional display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    id: Curie,
    label: Option<String>,
}

impl Term {
    /// Creates a new unlabeled [`Term`].
    #[must_use]
    pub fn new(id: Curie) -> Self {
        Self { id, label: None }
    }

    /// Sets a human friendly label for the term.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the identifier of the term.
    #[must_use]
    pub fn id(&self) -> &Curie {
        &self.id
    }

    /// Returns the ontology prefix of the term.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.id.prefix()
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Directed term graph of one `(prefix, version)` ontology snapshot.
///
/// Edge convention, fixed for the whole crate: an edge points from a term to
/// its immediately broader term. Ancestors are therefore reached by following
/// outgoing edges and descendants by following incoming edges.
///
/// Node ids are the CURIE text of the term and are compared verbatim. A graph
/// may hold terms from other prefixes (imported terms survive subsetting).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OntologyGraph {
    prefix: String,
    version: Option<String>,
    terms: BTreeMap<String, Term>,
    broader: BTreeMap<String, Vec<String>>,
    narrower: BTreeMap<String, Vec<String>>,
}

impl OntologyGraph {
    /// Creates an empty graph for the supplied ontology prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    /// Sets the version of the ontology snapshot.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Adds a term, enforcing unique identifiers.
    pub fn add_term(&mut self, term: Term) -> Result<(), OntologyError> {
        let id = term.id().to_string();
        if self.terms.contains_key(&id) {
            return Err(OntologyError::DuplicateTerm {
                ontology: self.prefix.clone(),
                term: id,
            });
        }
        self.terms.insert(id, term);
        Ok(())
    }

    /// Declares `broader` as an immediately broader term of `narrower`.
    ///
    /// Both terms must already be part of the graph. Returns `false` when the
    /// edge was already present.
    pub fn add_broader(&mut self, narrower: &str, broader: &str) -> Result<bool, OntologyError> {
        for id in [narrower, broader] {
            if !self.terms.contains_key(id) {
                return Err(OntologyError::MissingTerm {
                    ontology: self.prefix.clone(),
                    term: id.to_string(),
                });
            }
        }

        let parents = self.broader.entry(narrower.to_string()).or_default();
        if parents.iter().any(|parent| parent == broader) {
            return Ok(false);
        }
        parents.push(broader.to_string());
        self.narrower
            .entry(broader.to_string())
            .or_default()
            .push(narrower.to_string());
        Ok(true)
    }

    /// Returns the ontology prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the snapshot version, if known.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Retrieves a term by identifier.
    #[must_use]
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.terms.get(id)
    }

    /// Returns all terms ordered by identifier.
    #[must_use]
    pub fn terms(&self) -> &BTreeMap<String, Term> {
        &self.terms
    }

    /// Number of terms in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl TermGraph for OntologyGraph {
    fn has_node(&self, id: &str) -> bool {
        self.terms.contains_key(id)
    }

    fn broader(&self, id: &str) -> &[String] {
        self.broader.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn narrower(&self, id: &str) -> &[String] {
        self.narrower.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn label_of(&self, id: &str) -> Option<&str> {
        self.terms.get(id).and_then(Term::label)
    }
}

/// Errors raised when building an [`OntologyGraph`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OntologyError {
    /// Attempted to add a term with an existing identifier.
    #[error("term `{term}` already exists in ontology `{ontology}`")]
    DuplicateTerm { ontology: String, term: String },
    /// Referenced term was not part of the ontology.
    #[error("term `{term}` does not exist in ontology `{ontology}`")]
    MissingTerm { ontology: String, term: String },
}

#[cfg(test)]
mod tests {
    use super::{OntologyError, OntologyGraph, Term};
    use crate::ontology::{repositories::TermGraph, value_objects::Curie};

    fn term(text: &str) -> Term {
        Term::new(Curie::parse(text).expect("valid curie"))
    }

    #[test]
    fn edges_are_tracked_in_both_directions() {
        let mut graph = OntologyGraph::new("mondo").with_version("2025-03-04");
        graph
            .add_term(term("mondo:1").with_label("child"))
            .expect("child");
        graph.add_term(term("mondo:2")).expect("parent");

        assert!(graph.add_broader("mondo:1", "mondo:2").expect("edge"));
        assert!(!graph.add_broader("mondo:1", "mondo:2").expect("edge"));

        assert_eq!(graph.broader("mondo:1"), ["mondo:2".to_string()]);
        assert_eq!(graph.narrower("mondo:2"), ["mondo:1".to_string()]);
        assert!(graph.broader("mondo:2").is_empty());
        assert_eq!(graph.label_of("mondo:1"), Some("child"));
        assert_eq!(graph.label_of("mondo:2"), None);
        assert_eq!(graph.version(), Some("2025-03-04"));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn duplicate_terms_are_rejected() {
        let mut graph = OntologyGraph::new("mondo");
        graph.add_term(term("mondo:1")).expect("first insert");
        let err = graph.add_term(term("mondo:1")).expect_err("duplicate");
        assert!(matches!(err, OntologyError::DuplicateTerm { term, .. } if term == "mondo:1"));
    }

    #[test]
    fn edges_require_known_terms() {
        let mut graph = OntologyGraph::new("mondo");
        graph.add_term(term("mondo:1")).expect("term");
        let err = graph
            .add_broader("mondo:1", "mondo:404")
            .expect_err("missing parent");
        assert!(matches!(err, OntologyError::MissingTerm { term, .. } if term == "mondo:404"));
    }
}
