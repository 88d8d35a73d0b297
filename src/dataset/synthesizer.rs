use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use super::record::{MatchClass, RelationRecord};
use crate::mapping::{dedup, Mapping};
use crate::ontology::{
    bounded_ancestors, bounded_descendants, GraphCatalog, NameResolver, OntologyGraph, TermGraph,
};
use crate::relation::RelationContextExtractor;

/// Rows and batches left out of a synthesis run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipReport {
    /// Ontology pairs skipped because a graph was not loaded.
    pub batches: usize,
    /// Rows belonging to those pairs.
    pub batch_rows: usize,
    /// Training rows whose target term is not in the target graph.
    pub missing_targets: usize,
    /// Known broad/narrow rows lacking a name or a usable predicate.
    pub unusable: usize,
    /// Inference rows mapping a term to itself.
    pub self_mappings: usize,
    /// Inference rows below the similarity cutoff.
    pub below_cutoff: usize,
}

impl SkipReport {
    fn merge(&mut self, other: &Self) {
        self.batches += other.batches;
        self.batch_rows += other.batch_rows;
        self.missing_targets += other.missing_targets;
        self.unusable += other.unusable;
        self.self_mappings += other.self_mappings;
        self.below_cutoff += other.below_cutoff;
    }
}

/// Number of rows per label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts([usize; 3]);

impl ClassCounts {
    #[must_use]
    pub fn get(&self, class: MatchClass) -> usize {
        self.0[usize::from(class.id())]
    }

    pub fn add(&mut self, class: MatchClass) {
        self.0[usize::from(class.id())] += 1;
    }

    /// The class with the fewest rows; ties go to the earlier of
    /// exact, broad, narrow.
    #[must_use]
    pub fn least_populated(&self) -> MatchClass {
        MatchClass::ALL
            .into_iter()
            .min_by_key(|class| self.get(*class))
            .unwrap_or(MatchClass::Exact)
    }

    /// Broad and narrow, fewest rows first; ties go to broad.
    #[must_use]
    pub fn substitution_order(&self) -> [MatchClass; 2] {
        if self.get(MatchClass::Narrow) < self.get(MatchClass::Broad) {
            [MatchClass::Narrow, MatchClass::Broad]
        } else {
            [MatchClass::Broad, MatchClass::Narrow]
        }
    }

    fn merge(&mut self, other: Self) {
        for (count, extra) in self.0.iter_mut().zip(other.0) {
            *count += extra;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynthesisOutcome {
    pub records: Vec<RelationRecord>,
    pub counts: ClassCounts,
    pub skipped: SkipReport,
}

impl SynthesisOutcome {
    pub fn extend(&mut self, other: Self) {
        self.records.extend(other.records);
        self.counts.merge(other.counts);
        self.skipped.merge(&other.skipped);
    }
}

/// Builds labelled and unlabelled relation rows from correspondences.
pub struct DatasetSynthesizer<'a> {
    graphs: &'a GraphCatalog,
    resolver: &'a NameResolver,
    extractor: RelationContextExtractor,
}

impl<'a> DatasetSynthesizer<'a> {
    #[must_use]
    pub fn new(
        graphs: &'a GraphCatalog,
        resolver: &'a NameResolver,
        extractor: RelationContextExtractor,
    ) -> Self {
        Self {
            graphs,
            resolver,
            extractor,
        }
    }

    fn canonical(&self, prefix: &str) -> String {
        self.resolver
            .registry()
            .canonicalize(prefix)
            .map_or_else(|| prefix.to_lowercase(), str::to_string)
    }

    fn graph_pair(
        &self,
        source: &str,
        target: &str,
    ) -> Option<(&'a OntologyGraph, &'a OntologyGraph)> {
        Some((self.graphs.get(source)?, self.graphs.get(target)?))
    }

    /// Labelled rows for every unordered pair of `prefixes`, in order.
    ///
    /// For a pair `(a, b)` the exact pool is restricted to rows mapping `a`
    /// terms onto `b` terms.
    pub fn training<R: Rng + ?Sized>(
        &self,
        exact_pool: &[Mapping],
        prefixes: &[String],
        rng: &mut R,
    ) -> SynthesisOutcome {
        let pool = dedup(exact_pool.to_vec());
        let mut outcome = SynthesisOutcome::default();
        for (index, source) in prefixes.iter().enumerate() {
            for target in &prefixes[index + 1..] {
                let (source, target) = (self.canonical(source), self.canonical(target));
                let batch: Vec<&Mapping> = pool
                    .iter()
                    .filter(|mapping| {
                        self.canonical(&mapping.source_prefix) == source
                            && self.canonical(&mapping.target_prefix) == target
                    })
                    .collect();
                outcome.extend(self.training_batch(&source, &target, batch, rng));
            }
        }
        outcome
    }

    /// Labels one ontology pair's exact correspondences.
    ///
    /// Each row aims at the currently least populated class: `narrow` swaps
    /// the target for its nearest broader term, `broad` for its nearest
    /// narrower term. When that class has no candidate the other one is
    /// tried; rows with neither stay `exact`.
    pub fn training_batch<R: Rng + ?Sized>(
        &self,
        source_prefix: &str,
        target_prefix: &str,
        mut batch: Vec<&Mapping>,
        rng: &mut R,
    ) -> SynthesisOutcome {
        let mut outcome = SynthesisOutcome::default();
        let graphs = self.graph_pair(source_prefix, target_prefix);
        let Some((source_graph, target_graph)) = graphs else {
            warn!(source_prefix, target_prefix, rows = batch.len(), "synthesis_batch_skipped");
            outcome.skipped.batches = 1;
            outcome.skipped.batch_rows = batch.len();
            return outcome;
        };

        batch.shuffle(rng);
        for mapping in batch {
            if !target_graph.has_node(&mapping.target_id) {
                outcome.skipped.missing_targets += 1;
                continue;
            }
            let substituted = match outcome.counts.least_populated() {
                MatchClass::Exact => None,
                _ => outcome
                    .counts
                    .substitution_order()
                    .into_iter()
                    .find_map(|class| self.substitute(mapping, target_graph, class)),
            };
            let (row, class) =
                substituted.unwrap_or_else(|| (mapping.clone(), MatchClass::Exact));

            outcome.counts.add(class);
            let context = self
                .extractor
                .extract(&row, source_graph, target_graph, self.resolver);
            outcome
                .records
                .push(RelationRecord::new(&row, context, Some(class)));
        }

        info!(
            source_prefix,
            target_prefix,
            exact = outcome.counts.get(MatchClass::Exact),
            broad = outcome.counts.get(MatchClass::Broad),
            narrow = outcome.counts.get(MatchClass::Narrow),
            missing_targets = outcome.skipped.missing_targets,
            "synthesis_batch_labelled"
        );
        outcome
    }

    fn substitute(
        &self,
        mapping: &Mapping,
        target_graph: &OntologyGraph,
        class: MatchClass,
    ) -> Option<(Mapping, MatchClass)> {
        let max_distance = self.extractor.max_distance;
        let candidates = match class {
            MatchClass::Narrow => bounded_ancestors(target_graph, &mapping.target_id, max_distance),
            MatchClass::Broad => bounded_descendants(target_graph, &mapping.target_id, max_distance),
            MatchClass::Exact => return None,
        };
        let candidate = candidates
            .into_iter()
            .find(|candidate| target_graph.has_node(candidate))?;
        let target_name = self.resolver.resolve(&candidate).map(str::to_string);
        Some((
            Mapping {
                target_id: candidate,
                target_name,
                ..mapping.clone()
            },
            class,
        ))
    }

    /// Rows for broad/narrow correspondences asserted by evidence.
    ///
    /// Labels follow [`MatchClass::from_predicate`], so a `skos:broadMatch`
    /// row lands in the same class as a synthesized row whose target was
    /// moved to a broader term. Rows of other predicates or without names
    /// are counted as unusable.
    pub fn known_relations(&self, mappings: &[Mapping]) -> SynthesisOutcome {
        let mut outcome = SynthesisOutcome::default();
        let mut missing = BTreeSet::new();
        for mapping in mappings {
            let class = mapping.predicate.as_ref().and_then(MatchClass::from_predicate);
            let Some(class @ (MatchClass::Broad | MatchClass::Narrow)) = class else {
                outcome.skipped.unusable += 1;
                continue;
            };
            if !mapping.is_named() {
                outcome.skipped.unusable += 1;
                continue;
            }
            let pair = (
                self.canonical(&mapping.source_prefix),
                self.canonical(&mapping.target_prefix),
            );
            let Some((source_graph, target_graph)) = self.graph_pair(&pair.0, &pair.1) else {
                outcome.skipped.batch_rows += 1;
                missing.insert(pair);
                continue;
            };
            let context = self
                .extractor
                .extract(mapping, source_graph, target_graph, self.resolver);
            outcome.counts.add(class);
            outcome
                .records
                .push(RelationRecord::new(mapping, context, Some(class)));
        }
        self.report_missing(&missing);
        outcome.skipped.batches = missing.len();

        info!(
            broad = outcome.counts.get(MatchClass::Broad),
            narrow = outcome.counts.get(MatchClass::Narrow),
            unusable = outcome.skipped.unusable,
            "known_relations_ingested"
        );
        outcome
    }

    /// Unlabelled rows for an externally supplied batch.
    ///
    /// Self mappings are removed first; rows whose names are less similar
    /// than `cutoff` are dropped.
    pub fn inference(&self, batch: &[Mapping], cutoff: f64) -> SynthesisOutcome {
        let mut outcome = SynthesisOutcome::default();
        let mut missing = BTreeSet::new();
        for mapping in batch {
            if mapping.is_self_mapping() {
                outcome.skipped.self_mappings += 1;
                continue;
            }
            let pair = (
                self.canonical(&mapping.source_prefix),
                self.canonical(&mapping.target_prefix),
            );
            let Some((source_graph, target_graph)) = self.graph_pair(&pair.0, &pair.1) else {
                outcome.skipped.batch_rows += 1;
                missing.insert(pair);
                continue;
            };
            match self
                .extractor
                .enrich(mapping, source_graph, target_graph, self.resolver, cutoff)
            {
                Some(context) => outcome
                    .records
                    .push(RelationRecord::new(mapping, context, None)),
                None => outcome.skipped.below_cutoff += 1,
            }
        }
        self.report_missing(&missing);
        outcome.skipped.batches = missing.len();

        info!(
            rows = outcome.records.len(),
            self_mappings = outcome.skipped.self_mappings,
            below_cutoff = outcome.skipped.below_cutoff,
            skipped_batches = outcome.skipped.batches,
            "inference_batch_enriched"
        );
        outcome
    }

    fn report_missing(&self, missing: &BTreeSet<(String, String)>) {
        for (source_prefix, target_prefix) in missing {
            let absent: Vec<&str> = [source_prefix, target_prefix]
                .into_iter()
                .filter(|prefix| self.graphs.get(prefix).is_none())
                .map(String::as_str)
                .collect();
            warn!(%source_prefix, %target_prefix, ?absent, "synthesis_batch_skipped");
        }
    }
}
