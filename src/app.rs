//! # Application context
//!
//! [`AppContext`] is built once per run: it loads the configured ontology
//! graphs and name tables up front and hands them, read-only, to the
//! reconciliation and synthesis steps.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::{
    config::Config,
    dataset::{AppendStats, DatasetKind, DatasetSynthesizer, RelationDataset, SynthesisOutcome},
    mapping::Mapping,
    ontology::{GraphCatalog, GraphProvider, NameResolver, NameSource, PrefixRegistry},
    reconcile::{EvidenceReconciler, EvidenceTier, NameRepair, ReconciliationReport, ReportWriter},
    relation::RelationContextExtractor,
    Error, Result,
};

#[derive(Clone, Debug)]
pub struct AppContext {
    pub config: Config,
    pub graphs: GraphCatalog,
    pub resolver: NameResolver,
}

impl AppContext {
    /// Loads graphs and name tables of every configured resource.
    ///
    /// # Errors
    ///
    /// Fails when a collaborator fails; a resource without a graph snapshot is
    /// not an error.
    pub fn load<P, S>(
        config: Config,
        registry: PrefixRegistry,
        graphs: &P,
        names: &S,
    ) -> Result<Self>
    where
        P: GraphProvider,
        P::Error: std::error::Error + Send + Sync + 'static,
        S: NameSource,
        S::Error: std::error::Error + Send + Sync + 'static,
    {
        let catalog =
            GraphCatalog::load(registry.clone(), &config.resources, graphs).map_err(Error::wrap)?;
        let resolver =
            NameResolver::load(registry, &config.resources, names).map_err(Error::wrap)?;
        info!(
            resources = config.resources.len(),
            graphs = catalog.len(),
            "app_context_loaded"
        );
        Ok(Self::from_parts(config, catalog, resolver))
    }

    #[must_use]
    pub fn from_parts(config: Config, graphs: GraphCatalog, resolver: NameResolver) -> Self {
        Self {
            config,
            graphs,
            resolver,
        }
    }

    #[must_use]
    pub fn extractor(&self) -> RelationContextExtractor {
        RelationContextExtractor::from(&self.config.synthesis)
    }

    #[must_use]
    pub fn synthesizer(&self) -> DatasetSynthesizer<'_> {
        DatasetSynthesizer::new(&self.graphs, &self.resolver, self.extractor())
    }

    fn rng(&self) -> StdRng {
        self.config
            .synthesis
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }

    /// Reconciles `predicted` against `tiers`, ordered by trust.
    ///
    /// Tiers are made undirected when configured so, and missing prediction
    /// names are backfilled from the evidence before the name filter.
    #[must_use]
    pub fn reconcile(
        &self,
        predicted: Vec<Mapping>,
        tiers: Vec<EvidenceTier>,
    ) -> ReconciliationReport {
        let undirected = self.config.reconcile.undirected_evidence;
        let repair = NameRepair::from_corpus(tiers.iter().flat_map(EvidenceTier::mappings));
        let reconciler = tiers
            .into_iter()
            .map(|tier| if undirected { tier.undirected() } else { tier })
            .fold(EvidenceReconciler::new(), EvidenceReconciler::with_tier)
            .with_registry(self.resolver.registry().clone())
            .with_name_repair(repair);
        reconciler.reconcile(predicted)
    }

    /// Reconciles and writes the report files; returns the report directory.
    ///
    /// # Errors
    ///
    /// Fails when a report file cannot be written.
    pub fn reconcile_to_reports(
        &self,
        predicted: Vec<Mapping>,
        tiers: Vec<EvidenceTier>,
    ) -> Result<(ReconciliationReport, PathBuf)> {
        let report = self.reconcile(predicted, tiers);
        let dir = ReportWriter::from(&self.config.reconcile).write(&report)?;
        Ok((report, dir))
    }

    /// Synthesizes a labelled dataset and merges it into `path`.
    ///
    /// `exact` is the pool of known exact correspondences; `known` holds
    /// evidence rows whose broad/narrow predicates are ingested as is.
    ///
    /// # Errors
    ///
    /// Fails on a dataset schema violation or an I/O error; nothing is written
    /// in that case.
    pub fn synthesize_training(
        &self,
        exact: &[Mapping],
        known: &[Mapping],
        path: &Path,
    ) -> Result<(SynthesisOutcome, AppendStats)> {
        let prefixes: Vec<String> = self
            .config
            .resources
            .iter()
            .map(|resource| resource.prefix.clone())
            .collect();
        let synthesizer = self.synthesizer();
        let mut outcome = synthesizer.training(exact, &prefixes, &mut self.rng());
        outcome.extend(synthesizer.known_relations(known));

        let stats =
            RelationDataset::open(path, DatasetKind::Training).append(outcome.records.clone())?;
        Ok((outcome, stats))
    }

    /// Enriches an external batch and merges it into `path`.
    ///
    /// # Errors
    ///
    /// Fails on a dataset schema violation or an I/O error.
    pub fn synthesize_inference(
        &self,
        batch: &[Mapping],
        path: &Path,
    ) -> Result<(SynthesisOutcome, AppendStats)> {
        let outcome = self
            .synthesizer()
            .inference(batch, self.config.inference.edit_cutoff);
        let stats =
            RelationDataset::open(path, DatasetKind::Inference).append(outcome.records.clone())?;
        Ok((outcome, stats))
    }
}
