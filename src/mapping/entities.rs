use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ontology::Curie;

/// SKOS relation asserted by a correspondence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPredicate {
    Exact,
    Broad,
    Narrow,
    Other(String),
}

impl MatchPredicate {
    /// Reads a predicate CURIE such as `skos:exactMatch`.
    #[must_use]
    pub fn from_curie(text: &str) -> Self {
        match text.trim() {
            "skos:exactMatch" => Self::Exact,
            "skos:broadMatch" => Self::Broad,
            "skos:narrowMatch" => Self::Narrow,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_curie(&self) -> &str {
        match self {
            Self::Exact => "skos:exactMatch",
            Self::Broad => "skos:broadMatch",
            Self::Narrow => "skos:narrowMatch",
            Self::Other(other) => other,
        }
    }

    /// Predicate of the same correspondence read in the opposite direction.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Broad => Self::Narrow,
            Self::Narrow => Self::Broad,
            other => other.clone(),
        }
    }
}

impl Display for MatchPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_curie())
    }
}

/// Reconciliation key of a correspondence: `(source id, target prefix, target id)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingKey {
    pub source_id: String,
    pub target_prefix: String,
    pub target_id: String,
}

/// A directed correspondence between two ontology terms.
///
/// Names are `None` when they could not be resolved.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Mapping {
    pub source_id: String,
    pub source_name: Option<String>,
    pub source_prefix: String,
    pub target_id: String,
    pub target_name: Option<String>,
    pub target_prefix: String,
    pub predicate: Option<MatchPredicate>,
    pub confidence: Option<f64>,
    pub provenance: Option<String>,
}

impl Mapping {
    #[must_use]
    pub fn new(
        source_id: impl Into<String>,
        source_prefix: impl Into<String>,
        target_id: impl Into<String>,
        target_prefix: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_prefix: source_prefix.into(),
            target_id: target_id.into(),
            target_prefix: target_prefix.into(),
            ..Self::default()
        }
    }

    /// Builds a mapping between two CURIEs, taking the prefixes from the ids.
    pub fn between(source_id: &str, target_id: &str) -> Result<Self, crate::ontology::CurieError> {
        let source = Curie::parse(source_id)?;
        let target = Curie::parse(target_id)?;
        Ok(Self::new(
            source_id.trim(),
            source.prefix().to_lowercase(),
            target_id.trim(),
            target.prefix().to_lowercase(),
        ))
    }

    #[must_use]
    pub fn with_names(mut self, source_name: Option<&str>, target_name: Option<&str>) -> Self {
        self.source_name = source_name.map(str::to_string);
        self.target_name = target_name.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: MatchPredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    #[must_use]
    pub fn key(&self) -> MappingKey {
        MappingKey {
            source_id: self.source_id.clone(),
            target_prefix: self.target_prefix.clone(),
            target_id: self.target_id.clone(),
        }
    }

    /// Key of the same correspondence read from the target side.
    #[must_use]
    pub fn mirror_key(&self) -> MappingKey {
        MappingKey {
            source_id: self.target_id.clone(),
            target_prefix: self.source_prefix.clone(),
            target_id: self.source_id.clone(),
        }
    }

    /// Swaps source and target, inverting a broad/narrow predicate.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            source_name: self.target_name.clone(),
            source_prefix: self.target_prefix.clone(),
            target_id: self.source_id.clone(),
            target_name: self.source_name.clone(),
            target_prefix: self.source_prefix.clone(),
            predicate: self.predicate.as_ref().map(MatchPredicate::inverse),
            confidence: self.confidence,
            provenance: self.provenance.clone(),
        }
    }

    #[must_use]
    pub fn is_named(&self) -> bool {
        self.source_name.is_some() && self.target_name.is_some()
    }

    #[must_use]
    pub fn is_self_mapping(&self) -> bool {
        self.source_id == self.target_id
    }

    fn identity(&self) -> Identity<'_> {
        (
            &self.source_id,
            self.source_name.as_deref(),
            &self.source_prefix,
            &self.target_id,
            self.target_name.as_deref(),
            &self.target_prefix,
            self.predicate.as_ref(),
            self.confidence.map(f64::to_bits),
            self.provenance.as_deref(),
        )
    }
}

type Identity<'a> = (
    &'a str,
    Option<&'a str>,
    &'a str,
    &'a str,
    Option<&'a str>,
    &'a str,
    Option<&'a MatchPredicate>,
    Option<u64>,
    Option<&'a str>,
);

/// Removes rows identical in every field, keeping the first occurrence.
#[must_use]
pub fn dedup(mappings: Vec<Mapping>) -> Vec<Mapping> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::new();
        mappings
            .iter()
            .map(|mapping| seen.insert(mapping.identity()))
            .collect()
    };
    mappings
        .into_iter()
        .zip(keep)
        .filter_map(|(mapping, keep)| keep.then_some(mapping))
        .collect()
}

/// Adds the mirrored row of every mapping and drops duplicates.
#[must_use]
pub fn make_undirected(mappings: &[Mapping]) -> Vec<Mapping> {
    let rows = mappings
        .iter()
        .cloned()
        .chain(mappings.iter().map(Mapping::reversed))
        .collect();
    dedup(rows)
}
