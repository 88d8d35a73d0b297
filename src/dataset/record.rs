use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::mapping::{Mapping, MatchPredicate};
use crate::relation::RelationContext;

/// Label of a dataset row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MatchClass {
    Exact,
    Broad,
    Narrow,
}

impl MatchClass {
    /// Every class, in tie-breaking order.
    pub const ALL: [Self; 3] = [Self::Exact, Self::Broad, Self::Narrow];

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Broad => 1,
            Self::Narrow => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact match",
            Self::Broad => "broad match",
            Self::Narrow => "narrow match",
        }
    }

    /// Class of a row whose relation is asserted by a SKOS predicate.
    ///
    /// Classes place the source relative to the target: `Narrow` rows have a
    /// target broader than the source, as `skos:broadMatch` asserts.
    #[must_use]
    pub fn from_predicate(predicate: &MatchPredicate) -> Option<Self> {
        match predicate {
            MatchPredicate::Exact => Some(Self::Exact),
            MatchPredicate::Broad => Some(Self::Narrow),
            MatchPredicate::Narrow => Some(Self::Broad),
            MatchPredicate::Other(_) => None,
        }
    }
}

impl Display for MatchClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<MatchClass> for u8 {
    fn from(class: MatchClass) -> Self {
        class.id()
    }
}

impl TryFrom<u8> for MatchClass {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|class| class.id() == id)
            .ok_or_else(|| format!("unknown class id {id}"))
    }
}

/// Whether rows of a dataset carry a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Training,
    Inference,
}

impl DatasetKind {
    /// Describes why `record` does not belong to a dataset of this kind.
    #[must_use]
    pub fn violation(self, record: &RelationRecord) -> Option<&'static str> {
        match (self, record.class) {
            (Self::Training, None) => Some("training rows require a class"),
            (Self::Inference, Some(_)) => Some("inference rows must not carry a class"),
            _ => None,
        }
    }
}

/// One context-enriched correspondence, as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationRecord {
    #[serde(rename = "source identifier")]
    pub source_id: String,
    #[serde(rename = "source name")]
    pub source_name: Option<String>,
    #[serde(rename = "source prefix")]
    pub source_prefix: String,
    #[serde(rename = "target identifier")]
    pub target_id: String,
    #[serde(rename = "target name")]
    pub target_name: Option<String>,
    #[serde(rename = "target prefix")]
    pub target_prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<MatchClass>,
    #[serde(rename = "source descendant identifiers")]
    pub source_descendant_ids: Vec<String>,
    #[serde(rename = "source descendant names")]
    pub source_descendant_names: Vec<String>,
    #[serde(rename = "target descendant identifiers")]
    pub target_descendant_ids: Vec<String>,
    #[serde(rename = "target descendant names")]
    pub target_descendant_names: Vec<String>,
    #[serde(rename = "source ancestor identifiers")]
    pub source_ancestor_ids: Vec<String>,
    #[serde(rename = "source ancestor names")]
    pub source_ancestor_names: Vec<String>,
    #[serde(rename = "target ancestor identifiers")]
    pub target_ancestor_ids: Vec<String>,
    #[serde(rename = "target ancestor names")]
    pub target_ancestor_names: Vec<String>,
    pub edit_similarity: String,
}

impl RelationRecord {
    #[must_use]
    pub fn new(mapping: &Mapping, context: RelationContext, class: Option<MatchClass>) -> Self {
        Self {
            source_id: mapping.source_id.clone(),
            source_name: mapping.source_name.clone(),
            source_prefix: mapping.source_prefix.clone(),
            target_id: mapping.target_id.clone(),
            target_name: mapping.target_name.clone(),
            target_prefix: mapping.target_prefix.clone(),
            class,
            source_descendant_ids: context.source_descendants.ids,
            source_descendant_names: context.source_descendants.names,
            target_descendant_ids: context.target_descendants.ids,
            target_descendant_names: context.target_descendants.names,
            source_ancestor_ids: context.source_ancestors.ids,
            source_ancestor_names: context.source_ancestors.names,
            target_ancestor_ids: context.target_ancestors.ids,
            target_ancestor_names: context.target_ancestors.names,
            edit_similarity: context.similarity.to_string(),
        }
    }

    /// Lower-cases every display name, identifiers untouched.
    #[must_use]
    pub fn casefolded(mut self) -> Self {
        for name in [&mut self.source_name, &mut self.target_name]
            .into_iter()
            .flatten()
        {
            *name = name.to_lowercase();
        }
        for names in [
            &mut self.source_descendant_names,
            &mut self.target_descendant_names,
            &mut self.source_ancestor_names,
            &mut self.target_ancestor_names,
        ] {
            for name in names.iter_mut() {
                *name = name.to_lowercase();
            }
        }
        self
    }
}
