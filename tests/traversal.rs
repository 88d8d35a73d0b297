use std::collections::HashMap;

use mapnet::ontology::{
    bounded_ancestors, bounded_descendants, top_k_named_relations, Curie, Direction,
    NameResolver, NameTable, OntologyGraph, PrefixRegistry, Term, TermGraph,
};
use rstest::rstest;

/// Adjacency-list graph independent from [`OntologyGraph`].
#[derive(Default)]
struct AdjacencyStub {
    broader: HashMap<String, Vec<String>>,
    narrower: HashMap<String, Vec<String>>,
    labels: HashMap<String, String>,
}

impl AdjacencyStub {
    fn edge(mut self, narrower: &str, broader: &str) -> Self {
        for id in [narrower, broader] {
            self.broader.entry(id.to_string()).or_default();
            self.narrower.entry(id.to_string()).or_default();
        }
        self.broader
            .entry(narrower.to_string())
            .or_default()
            .push(broader.to_string());
        self.narrower
            .entry(broader.to_string())
            .or_default()
            .push(narrower.to_string());
        self
    }
}

impl TermGraph for AdjacencyStub {
    fn has_node(&self, id: &str) -> bool {
        self.broader.contains_key(id)
    }

    fn broader(&self, id: &str) -> &[String] {
        self.broader.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn narrower(&self, id: &str) -> &[String] {
        self.narrower.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn label_of(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }
}

/// `a -> b -> c`: the broader term of `a` is `b`, the broader term of `b` is `c`.
fn abc() -> OntologyGraph {
    let mut graph = OntologyGraph::new("o");
    for (id, label) in [("o:a", "alpha"), ("o:b", "beta"), ("o:c", "gamma")] {
        graph
            .add_term(Term::new(Curie::parse(id).expect("curie")).with_label(label))
            .expect("term");
    }
    graph.add_broader("o:a", "o:b").expect("edge");
    graph.add_broader("o:b", "o:c").expect("edge");
    graph
}

fn resolver(names: &[(&str, &str)]) -> NameResolver {
    let mut table = NameTable::new("o");
    for (id, name) in names {
        table.insert(*id, *name);
    }
    NameResolver::new(PrefixRegistry::new()).with_table(table)
}

#[test]
fn chain_scenario() {
    let graph = abc();
    assert_eq!(bounded_ancestors(&graph, "o:a", 2), vec!["o:b", "o:c"]);
    assert_eq!(bounded_descendants(&graph, "o:c", 2), vec!["o:b", "o:a"]);
    assert_eq!(bounded_ancestors(&graph, "o:a", 1), vec!["o:b"]);
    assert_eq!(graph.label_of("o:b"), Some("beta"));
}

#[rstest]
#[case(Direction::Ancestors)]
#[case(Direction::Descendants)]
fn absent_terms_have_no_relations(#[case] direction: Direction) {
    let graph = abc();
    let resolver = resolver(&[("a", "alpha"), ("b", "beta"), ("c", "gamma")]);

    assert!(bounded_ancestors(&graph, "o:zzz", 3).is_empty());
    assert!(bounded_descendants(&graph, "o:zzz", 3).is_empty());
    assert!(top_k_named_relations(&graph, "o:zzz", &resolver, 3, 3, direction).is_empty());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(5)]
fn named_relations_are_bounded_by_k(#[case] k: usize) {
    let graph = AdjacencyStub::default()
        .edge("o:1", "o:2")
        .edge("o:1", "o:3")
        .edge("o:2", "o:4")
        .edge("o:3", "o:5")
        .edge("o:4", "o:6");
    let resolver = resolver(&[("2", "two"), ("4", "four"), ("5", "five"), ("6", "six")]);

    let relations = top_k_named_relations(&graph, "o:1", &resolver, k, 3, Direction::Ancestors);
    assert!(relations.len() <= k);
    assert_eq!(relations.ids.len(), relations.names.len());
    let expected = ["o:2", "o:4", "o:5", "o:6"];
    assert_eq!(relations.ids, expected[..k.min(expected.len())]);
}

#[test]
fn stub_graphs_follow_the_edge_convention() {
    let graph = AdjacencyStub::default().edge("o:a", "o:b").edge("o:b", "o:c");
    assert_eq!(bounded_ancestors(&graph, "o:a", 2), bounded_ancestors(&abc(), "o:a", 2));
    assert_eq!(
        bounded_descendants(&graph, "o:c", 2),
        bounded_descendants(&abc(), "o:c", 2)
    );
}
