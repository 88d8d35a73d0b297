use std::collections::HashMap;

use super::entities::OntologyGraph;

/// Minimal read capability over a directed term graph.
///
/// Every traversal primitive in [`super::traversal`] is written against this
/// trait only. Implementors must follow the crate-wide edge convention: an
/// edge points from a term to its immediately broader term, so
/// [`TermGraph::broader`] lists outgoing neighbours and
/// [`TermGraph::narrower`] lists incoming neighbours.
pub trait TermGraph {
    /// Returns `true` when the term is part of the graph.
    fn has_node(&self, id: &str) -> bool;

    /// Immediately broader terms (outgoing edges), in insertion order.
    fn broader(&self, id: &str) -> &[String];

    /// Immediately narrower terms (incoming edges), in insertion order.
    fn narrower(&self, id: &str) -> &[String];

    /// Label stored on the graph node, if any.
    fn label_of(&self, id: &str) -> Option<&str>;
}

/// Contract describing how ontology snapshots are acquired.
///
/// Parsing raw ontology files happens outside of this crate; implementors hand
/// over a fully built graph.
pub trait GraphProvider {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Loads the graph of the `(prefix, version)` snapshot.
    ///
    /// Implementors must return `Ok(None)` when no snapshot is available.
    fn load_graph(
        &self,
        prefix: &str,
        version: Option<&str>,
    ) -> Result<Option<OntologyGraph>, Self::Error>;
}

/// Contract describing where id → label tables come from.
pub trait NameSource {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Returns the local id → label table of a namespace.
    ///
    /// Implementors must return an empty map when the namespace is unknown.
    fn id_name_mapping(
        &self,
        prefix: &str,
        version: Option<&str>,
    ) -> Result<HashMap<String, String>, Self::Error>;
}
