//! Context-enriched relation datasets.
//!
//! Training rows carry an `exact` / `broad` / `narrow` label, inference rows
//! carry none. Both are persisted as JSON Lines through [`RelationDataset`].

pub mod record;
pub mod store;
pub mod synthesizer;

pub use record::{DatasetKind, MatchClass, RelationRecord};
pub use store::{AppendStats, DatasetError, RelationDataset};
pub use synthesizer::{ClassCounts, DatasetSynthesizer, SkipReport, SynthesisOutcome};
