use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

use tracing::{info, warn};

use super::entities::OntologyGraph;
use super::registry::PrefixRegistry;
use super::repositories::{GraphProvider, NameSource};
use crate::config::ResourceConfig;

/// Read-only set of the ontology graphs loaded for a run, keyed by canonical
/// prefix.
#[derive(Clone, Debug, Default)]
pub struct GraphCatalog {
    registry: PrefixRegistry,
    graphs: BTreeMap<String, OntologyGraph>,
}

impl GraphCatalog {
    #[must_use]
    pub fn new(registry: PrefixRegistry) -> Self {
        Self {
            registry,
            graphs: BTreeMap::new(),
        }
    }

    /// Loads the graph of every configured resource.
    ///
    /// Resources without an available snapshot are logged and left out; the
    /// batches referencing them are skipped later on.
    pub fn load<P: GraphProvider>(
        registry: PrefixRegistry,
        resources: &[ResourceConfig],
        provider: &P,
    ) -> Result<Self, P::Error> {
        let mut catalog = Self::new(registry);
        for resource in resources {
            match provider.load_graph(&resource.prefix, resource.version.as_deref())? {
                Some(graph) => {
                    info!(prefix = %resource.prefix, terms = graph.len(), "ontology_graph_loaded");
                    catalog.insert(&resource.prefix, graph);
                }
                None => {
                    warn!(prefix = %resource.prefix, version = ?resource.version, "ontology_graph_missing");
                }
            }
        }
        Ok(catalog)
    }

    /// Adds (or replaces) the graph registered for `prefix`.
    pub fn insert(&mut self, prefix: &str, graph: OntologyGraph) {
        if !self.registry.contains(prefix) {
            self.registry.register(prefix);
        }
        let key = self
            .registry
            .canonicalize(prefix)
            .map_or_else(|| prefix.to_lowercase(), str::to_string);
        self.graphs.insert(key, graph);
    }

    #[must_use]
    pub fn with_graph(mut self, prefix: &str, graph: OntologyGraph) -> Self {
        self.insert(prefix, graph);
        self
    }

    /// Returns the graph of `prefix`, if one was loaded.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&OntologyGraph> {
        let key = self.registry.canonicalize(prefix)?;
        self.graphs.get(key)
    }

    /// Canonical prefixes that have a loaded graph.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.graphs.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

/// In-memory snapshot source serving both graphs and name tables.
///
/// Useful when the ontologies were parsed by the caller, and in tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryResources {
    graphs: HashMap<String, OntologyGraph>,
    names: HashMap<String, HashMap<String, String>>,
}

impl InMemoryResources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a graph under its own prefix and harvests its node labels
    /// into the name table of that prefix.
    #[must_use]
    pub fn with_graph(mut self, graph: OntologyGraph) -> Self {
        let prefix = graph.prefix().to_lowercase();
        let names = self.names.entry(prefix.clone()).or_default();
        for term in graph.terms().values() {
            if let Some(label) = term.label() {
                names.insert(term.id().local_id().to_string(), label.to_string());
            }
        }
        self.graphs.insert(prefix, graph);
        self
    }

    /// Adds an extra name table, e.g. for a secondary namespace.
    #[must_use]
    pub fn with_names(
        mut self,
        namespace: &str,
        names: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.names
            .entry(namespace.to_lowercase())
            .or_default()
            .extend(names);
        self
    }
}

impl GraphProvider for InMemoryResources {
    type Error = Infallible;

    fn load_graph(
        &self,
        prefix: &str,
        _version: Option<&str>,
    ) -> Result<Option<OntologyGraph>, Self::Error> {
        Ok(self.graphs.get(&prefix.to_lowercase()).cloned())
    }
}

impl NameSource for InMemoryResources {
    type Error = Infallible;

    fn id_name_mapping(
        &self,
        prefix: &str,
        _version: Option<&str>,
    ) -> Result<HashMap<String, String>, Self::Error> {
        Ok(self
            .names
            .get(&prefix.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::{GraphCatalog, InMemoryResources};
    use crate::config::ResourceConfig;
    use crate::ontology::{
        entities::{OntologyGraph, Term},
        registry::PrefixRegistry,
        repositories::NameSource,
        value_objects::Curie,
    };

    fn graph(prefix: &str) -> OntologyGraph {
        let mut graph = OntologyGraph::new(prefix);
        graph
            .add_term(
                Term::new(Curie::new(prefix, "1").expect("curie")).with_label(format!("{prefix} root")),
            )
            .expect("term");
        graph
    }

    #[test]
    fn missing_graphs_are_left_out_of_the_catalog() {
        let resources = InMemoryResources::new().with_graph(graph("mesh"));
        let configured = vec![ResourceConfig::new("MESH"), ResourceConfig::new("ncit")];

        let catalog = GraphCatalog::load(PrefixRegistry::disease_landscape(), &configured, &resources)
            .expect("infallible");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("mesh").is_some());
        assert!(catalog.get("MeSH").is_some());
        assert!(catalog.get("ncit").is_none());
        assert_eq!(catalog.prefixes().collect::<Vec<_>>(), vec!["mesh"]);
    }

    #[test]
    fn graph_labels_become_name_tables() {
        let resources = InMemoryResources::new().with_graph(graph("doid"));
        let names = resources.id_name_mapping("DOID", None).expect("infallible");
        assert_eq!(names.get("1").map(String::as_str), Some("doid root"));
        assert!(resources
            .id_name_mapping("unknown", None)
            .expect("infallible")
            .is_empty());
    }
}
