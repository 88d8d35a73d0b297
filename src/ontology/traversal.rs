//! Bounded breadth-first traversal over a [`TermGraph`].
//!
//! Distances are counted in hops from the start term. The start term itself
//! is never part of a result, and a start term that is not in the graph yields
//! an empty result rather than an error: ontology subsets legitimately prune
//! terms.

use std::collections::{HashSet, VecDeque};

use super::names::NameResolver;
use super::repositories::TermGraph;

/// Direction of a traversal relative to the fixed edge convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Broader terms, reached through outgoing edges.
    Ancestors,
    /// Narrower terms, reached through incoming edges.
    Descendants,
}

/// Lazy breadth-first walk yielding `(term, distance)` in non-decreasing
/// distance order, each reachable term once.
pub struct BoundedBfs<'a, G: TermGraph + ?Sized> {
    graph: &'a G,
    direction: Direction,
    max_distance: usize,
    queue: VecDeque<(&'a str, usize)>,
    visited: HashSet<&'a str>,
}

impl<'a, G: TermGraph + ?Sized> BoundedBfs<'a, G> {
    pub fn new(graph: &'a G, start: &'a str, max_distance: usize, direction: Direction) -> Self {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        if graph.has_node(start) {
            queue.push_back((start, 0));
            visited.insert(start);
        }
        Self {
            graph,
            direction,
            max_distance,
            queue,
            visited,
        }
    }

    fn neighbours(&self, id: &str) -> &'a [String] {
        match self.direction {
            Direction::Ancestors => self.graph.broader(id),
            Direction::Descendants => self.graph.narrower(id),
        }
    }
}

impl<'a, G: TermGraph + ?Sized> Iterator for BoundedBfs<'a, G> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (current, distance) = self.queue.pop_front()?;
        if distance < self.max_distance {
            for neighbour in self.neighbours(current) {
                if self.visited.insert(neighbour.as_str()) {
                    self.queue.push_back((neighbour.as_str(), distance + 1));
                }
            }
        }
        if distance == 0 {
            // the start term is not part of its own neighbourhood
            return self.next();
        }
        Some((current, distance))
    }
}

/// All terms broader than `term` within `max_distance` hops, in traversal order.
pub fn bounded_ancestors<G: TermGraph + ?Sized>(
    graph: &G,
    term: &str,
    max_distance: usize,
) -> Vec<String> {
    collect(graph, term, max_distance, Direction::Ancestors)
}

/// All terms narrower than `term` within `max_distance` hops, in traversal order.
pub fn bounded_descendants<G: TermGraph + ?Sized>(
    graph: &G,
    term: &str,
    max_distance: usize,
) -> Vec<String> {
    collect(graph, term, max_distance, Direction::Descendants)
}

fn collect<G: TermGraph + ?Sized>(
    graph: &G,
    term: &str,
    max_distance: usize,
    direction: Direction,
) -> Vec<String> {
    BoundedBfs::new(graph, term, max_distance, direction)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Ids and resolved names of the closest related terms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedRelations {
    pub ids: Vec<String>,
    pub names: Vec<String>,
}

impl NamedRelations {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Collects up to `k` related terms whose names resolve, nearest first.
///
/// Terms whose name cannot be resolved are skipped and do not count towards
/// `k`; the walk stops as soon as `k` named terms are found.
pub fn top_k_named_relations<G: TermGraph + ?Sized>(
    graph: &G,
    term: &str,
    resolver: &NameResolver,
    k: usize,
    max_distance: usize,
    direction: Direction,
) -> NamedRelations {
    let mut relations = NamedRelations::default();
    if k == 0 {
        return relations;
    }
    for (id, _) in BoundedBfs::new(graph, term, max_distance, direction) {
        let Some(name) = resolver.resolve(id) else {
            continue;
        };
        relations.ids.push(id.to_string());
        relations.names.push(name.to_string());
        if relations.len() == k {
            break;
        }
    }
    relations
}
