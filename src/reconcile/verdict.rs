use crate::mapping::{Mapping, MappingKey};

/// Evidence that disputes a predicted target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contradiction {
    /// Target ids the evidence asserts instead, sorted.
    pub true_ids: Vec<String>,
    /// Names of those targets, sorted and without duplicates.
    pub true_names: Vec<String>,
    /// Key of the mirrored correspondence the verdict was inherited from.
    pub mirror: Option<MappingKey>,
}

impl Contradiction {
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    /// Term the true ids were asserted for.
    ///
    /// For an inherited verdict this is the source of the mirrored key, i.e.
    /// the target of `mapping`, since the ids live in that term's ontology
    /// pairing rather than in `mapping`'s target ontology.
    #[must_use]
    pub fn asserted_for<'a>(&'a self, mapping: &'a Mapping) -> &'a str {
        self.mirror
            .as_ref()
            .map_or(mapping.source_id.as_str(), |key| key.source_id.as_str())
    }
}

/// Outcome of checking one predicted key against one evidence tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Confirmed,
    Contradicted(Contradiction),
    Unverified,
}

impl Verdict {
    #[must_use]
    pub fn is_unverified(&self) -> bool {
        matches!(self, Self::Unverified)
    }
}

/// Partition of the rows submitted to one evidence tier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierOutcome {
    pub tier: String,
    pub confirmed: Vec<Mapping>,
    pub contradicted: Vec<(Mapping, Contradiction)>,
    pub unverified: Vec<Mapping>,
}

impl TierOutcome {
    #[must_use]
    pub fn new(tier: impl Into<String>) -> Self {
        Self {
            tier: tier.into(),
            ..Self::default()
        }
    }

    /// Number of rows classified by the tier.
    #[must_use]
    pub fn len(&self) -> usize {
        self.confirmed.len() + self.contradicted.len() + self.unverified.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of reconciling one batch of predictions against every tier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReconciliationReport {
    /// Rows set aside because a side has no resolvable name.
    pub unnamed: Vec<Mapping>,
    pub tiers: Vec<TierOutcome>,
    /// Rows no tier had any evidence for.
    pub novel: Vec<Mapping>,
}

impl ReconciliationReport {
    pub fn confirmed(&self) -> impl Iterator<Item = &Mapping> {
        self.tiers.iter().flat_map(|tier| tier.confirmed.iter())
    }

    pub fn contradicted(&self) -> impl Iterator<Item = &(Mapping, Contradiction)> {
        self.tiers.iter().flat_map(|tier| tier.contradicted.iter())
    }

    #[must_use]
    pub fn novel(&self) -> &[Mapping] {
        &self.novel
    }
}
