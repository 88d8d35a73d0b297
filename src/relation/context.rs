use crate::config::SynthesisConfig;
use crate::mapping::Mapping;
use crate::ontology::{top_k_named_relations, Direction, NameResolver, NamedRelations, TermGraph};

use super::similarity::{normalized_edit_similarity, SimilaritySignal};

/// Bounded graph neighbourhood of both sides of a correspondence.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationContext {
    pub source_descendants: NamedRelations,
    pub target_descendants: NamedRelations,
    pub source_ancestors: NamedRelations,
    pub target_ancestors: NamedRelations,
    pub similarity: SimilaritySignal,
}

/// Computes [`RelationContext`]s with fixed traversal bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationContextExtractor {
    pub max_distance: usize,
    pub max_relations: usize,
    pub bin_similarity: bool,
}

impl Default for RelationContextExtractor {
    fn default() -> Self {
        Self::from(&SynthesisConfig::default())
    }
}

impl From<&SynthesisConfig> for RelationContextExtractor {
    fn from(config: &SynthesisConfig) -> Self {
        Self {
            max_distance: config.max_distance,
            max_relations: config.max_relations,
            bin_similarity: config.bin_similarity,
        }
    }
}

impl RelationContextExtractor {
    #[must_use]
    pub fn new(max_distance: usize, max_relations: usize) -> Self {
        Self {
            max_distance,
            max_relations,
            bin_similarity: true,
        }
    }

    #[must_use]
    pub fn with_bin_similarity(mut self, bin_similarity: bool) -> Self {
        self.bin_similarity = bin_similarity;
        self
    }

    /// Collects the four context lists of `mapping`, regardless of similarity.
    pub fn extract<S, T>(
        &self,
        mapping: &Mapping,
        source_graph: &S,
        target_graph: &T,
        resolver: &NameResolver,
    ) -> RelationContext
    where
        S: TermGraph + ?Sized,
        T: TermGraph + ?Sized,
    {
        let similarity = name_similarity(mapping);
        self.build(mapping, source_graph, target_graph, resolver, similarity)
    }

    /// Context of `mapping`, or `None` when the similarity of its names falls
    /// below `cutoff`.
    ///
    /// A `cutoff` of zero never drops a row.
    pub fn enrich<S, T>(
        &self,
        mapping: &Mapping,
        source_graph: &S,
        target_graph: &T,
        resolver: &NameResolver,
        cutoff: f64,
    ) -> Option<RelationContext>
    where
        S: TermGraph + ?Sized,
        T: TermGraph + ?Sized,
    {
        let similarity = name_similarity(mapping);
        if similarity < cutoff {
            return None;
        }
        Some(self.build(mapping, source_graph, target_graph, resolver, similarity))
    }

    fn build<S, T>(
        &self,
        mapping: &Mapping,
        source_graph: &S,
        target_graph: &T,
        resolver: &NameResolver,
        similarity: f64,
    ) -> RelationContext
    where
        S: TermGraph + ?Sized,
        T: TermGraph + ?Sized,
    {
        let source = |direction| self.related(source_graph, &mapping.source_id, resolver, direction);
        let target = |direction| self.related(target_graph, &mapping.target_id, resolver, direction);
        RelationContext {
            source_descendants: source(Direction::Descendants),
            target_descendants: target(Direction::Descendants),
            source_ancestors: source(Direction::Ancestors),
            target_ancestors: target(Direction::Ancestors),
            similarity: SimilaritySignal::new(similarity, self.bin_similarity),
        }
    }

    fn related<G: TermGraph + ?Sized>(
        &self,
        graph: &G,
        id: &str,
        resolver: &NameResolver,
        direction: Direction,
    ) -> NamedRelations {
        top_k_named_relations(
            graph,
            id,
            resolver,
            self.max_relations,
            self.max_distance,
            direction,
        )
    }
}

/// Similarity of the display names; zero when either name is missing.
fn name_similarity(mapping: &Mapping) -> f64 {
    match (mapping.source_name.as_deref(), mapping.target_name.as_deref()) {
        (Some(source), Some(target)) => normalized_edit_similarity(source, target),
        _ => 0.0,
    }
}
