use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use super::verdict::{Contradiction, ReconciliationReport, TierOutcome, Verdict};
use crate::mapping::{make_undirected, Mapping, MappingKey};
use crate::ontology::PrefixRegistry;

/// A named, trusted set of correspondences.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvidenceTier {
    name: String,
    mappings: Vec<Mapping>,
}

impl EvidenceTier {
    #[must_use]
    pub fn new(name: impl Into<String>, mappings: Vec<Mapping>) -> Self {
        Self {
            name: name.into(),
            mappings,
        }
    }

    /// Adds the mirrored row of every correspondence.
    #[must_use]
    pub fn undirected(self) -> Self {
        Self {
            mappings: make_undirected(&self.mappings),
            name: self.name,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }
}

/// Targets asserted by evidence per `(source id, target prefix)`.
struct EvidenceIndex<'a> {
    asserted: HashMap<(&'a str, &'a str), Asserted<'a>>,
}

#[derive(Default)]
struct Asserted<'a> {
    ids: BTreeSet<&'a str>,
    names: BTreeSet<&'a str>,
}

impl<'a> EvidenceIndex<'a> {
    fn new(evidence: &'a [Mapping]) -> Self {
        let mut asserted: HashMap<_, Asserted<'a>> = HashMap::new();
        for mapping in evidence {
            let entry = asserted
                .entry((mapping.source_id.as_str(), mapping.target_prefix.as_str()))
                .or_default();
            entry.ids.insert(mapping.target_id.as_str());
            if let Some(name) = mapping.target_name.as_deref() {
                entry.names.insert(name);
            }
        }
        Self { asserted }
    }

    fn verdict(&self, mapping: &Mapping) -> Verdict {
        let key = (mapping.source_id.as_str(), mapping.target_prefix.as_str());
        let Some(asserted) = self.asserted.get(&key) else {
            return Verdict::Unverified;
        };
        if asserted.ids.contains(mapping.target_id.as_str()) {
            return Verdict::Confirmed;
        }
        Verdict::Contradicted(Contradiction {
            true_ids: asserted.ids.iter().map(|id| (*id).to_string()).collect(),
            true_names: asserted.names.iter().map(|name| (*name).to_string()).collect(),
            mirror: None,
        })
    }
}

/// Classifies one batch against a single tier.
///
/// Every distinct key gets exactly one verdict, shared by all rows carrying
/// it. After the direct join, an unverified key whose mirrored key was
/// contradicted within the same batch is promoted to contradicted; this
/// closure runs once and only looks at the verdicts of the direct join.
#[must_use]
pub fn classify(tier: &EvidenceTier, predicted: Vec<Mapping>) -> TierOutcome {
    let index = EvidenceIndex::new(tier.mappings());
    let mut verdicts: HashMap<MappingKey, Verdict> = HashMap::new();
    for mapping in &predicted {
        verdicts
            .entry(mapping.key())
            .or_insert_with(|| index.verdict(mapping));
    }

    let promoted: HashMap<MappingKey, Contradiction> = predicted
        .iter()
        .filter(|mapping| verdicts.get(&mapping.key()).is_some_and(Verdict::is_unverified))
        .filter_map(|mapping| {
            let mirror = mapping.mirror_key();
            match verdicts.get(&mirror) {
                Some(Verdict::Contradicted(contradiction)) => Some((
                    mapping.key(),
                    Contradiction {
                        mirror: Some(mirror),
                        ..contradiction.clone()
                    },
                )),
                _ => None,
            }
        })
        .collect();
    let promotions = promoted.len();
    for (key, contradiction) in promoted {
        debug!(source = %key.source_id, target = %key.target_id, "mirrored_contradiction_promoted");
        verdicts.insert(key, Verdict::Contradicted(contradiction));
    }

    let mut outcome = TierOutcome::new(tier.name());
    for mapping in predicted {
        match verdicts.get(&mapping.key()) {
            Some(Verdict::Confirmed) => outcome.confirmed.push(mapping),
            Some(Verdict::Contradicted(contradiction)) => {
                let contradiction = contradiction.clone();
                outcome.contradicted.push((mapping, contradiction));
            }
            _ => outcome.unverified.push(mapping),
        }
    }

    info!(
        tier = %outcome.tier,
        confirmed = outcome.confirmed.len(),
        contradicted = outcome.contradicted.len(),
        unverified = outcome.unverified.len(),
        promotions,
        "evidence_tier_reconciled"
    );
    outcome
}

/// Backfills missing names from a broader corpus before the name filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameRepair {
    names: HashMap<String, String>,
}

impl NameRepair {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the first name seen for every id on either side of `corpus`.
    #[must_use]
    pub fn from_corpus<'a>(corpus: impl IntoIterator<Item = &'a Mapping>) -> Self {
        let mut repair = Self::new();
        for mapping in corpus {
            for (id, name) in [
                (&mapping.source_id, &mapping.source_name),
                (&mapping.target_id, &mapping.target_name),
            ] {
                if let Some(name) = name {
                    repair
                        .names
                        .entry(id.clone())
                        .or_insert_with(|| name.clone());
                }
            }
        }
        repair
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    /// Fills the missing names of `mapping`; returns whether anything changed.
    pub fn repair(&self, mapping: &mut Mapping) -> bool {
        let mut repaired = false;
        for (id, name) in [
            (&mapping.source_id, &mut mapping.source_name),
            (&mapping.target_id, &mut mapping.target_name),
        ] {
            if name.is_none() {
                if let Some(known) = self.names.get(id) {
                    *name = Some(known.clone());
                    repaired = true;
                }
            }
        }
        repaired
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Checks predictions against evidence tiers ordered by trust.
///
/// Rows left unverified by a tier are handed to the next one; whatever the
/// last tier leaves unverified is novel. Prefixes of predictions and evidence
/// are brought to their registered spelling before the join.
#[derive(Clone, Debug, Default)]
pub struct EvidenceReconciler {
    tiers: Vec<EvidenceTier>,
    repair: Option<NameRepair>,
    registry: PrefixRegistry,
}

impl EvidenceReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tier(mut self, tier: EvidenceTier) -> Self {
        self.tiers.push(tier);
        self
    }

    #[must_use]
    pub fn with_name_repair(mut self, repair: NameRepair) -> Self {
        self.repair = Some(repair);
        self
    }

    #[must_use]
    pub fn with_registry(mut self, registry: PrefixRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn tiers(&self) -> &[EvidenceTier] {
        &self.tiers
    }

    fn canonical_prefix(&self, prefix: &str) -> String {
        self.registry
            .canonicalize(prefix)
            .map_or_else(|| prefix.to_lowercase(), str::to_string)
    }

    /// `mapping` with registered prefixes in canonical spelling; ids of
    /// unregistered prefixes are kept as written.
    fn canonical(&self, mut mapping: Mapping) -> Mapping {
        mapping.source_prefix = self.canonical_prefix(&mapping.source_prefix);
        mapping.target_prefix = self.canonical_prefix(&mapping.target_prefix);
        for id in [&mut mapping.source_id, &mut mapping.target_id] {
            let canonical = id.split_once(':').and_then(|(prefix, local)| {
                self.registry
                    .canonicalize(prefix)
                    .map(|prefix| format!("{prefix}:{local}"))
            });
            if let Some(canonical) = canonical {
                *id = canonical;
            }
        }
        mapping
    }

    #[must_use]
    pub fn reconcile(&self, predicted: Vec<Mapping>) -> ReconciliationReport {
        let mut pending = Vec::with_capacity(predicted.len());
        let mut unnamed = Vec::new();
        let mut repaired = 0usize;
        for mut mapping in predicted {
            if let Some(repair) = &self.repair {
                repaired += usize::from(repair.repair(&mut mapping));
            }
            if mapping.is_named() {
                pending.push(self.canonical(mapping));
            } else {
                unnamed.push(mapping);
            }
        }
        info!(
            named = pending.len(),
            unnamed = unnamed.len(),
            repaired,
            "prediction_names_checked"
        );

        let mut tiers = Vec::with_capacity(self.tiers.len());
        for tier in &self.tiers {
            let evidence = tier
                .mappings()
                .iter()
                .map(|mapping| self.canonical(mapping.clone()))
                .collect();
            let outcome = classify(&EvidenceTier::new(tier.name(), evidence), pending);
            pending = outcome.unverified.clone();
            tiers.push(outcome);
        }

        ReconciliationReport {
            unnamed,
            tiers,
            novel: pending,
        }
    }
}
