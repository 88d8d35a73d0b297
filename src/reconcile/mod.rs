//! Tiered reconciliation of predicted correspondences against evidence.
//!
//! Predictions are keyed by `(source id, target prefix, target id)`. Against
//! each tier a key is confirmed when the evidence asserts that target for the
//! source within the target ontology, contradicted when the evidence asserts
//! other targets only, and unverified when the evidence says nothing about the
//! source in that ontology.

pub mod reconciler;
pub mod report;
pub mod verdict;

pub use reconciler::{classify, EvidenceReconciler, EvidenceTier, NameRepair};
pub use report::{contradictions_table, predictions_table, ReportWriter};
pub use verdict::{Contradiction, ReconciliationReport, TierOutcome, Verdict};
