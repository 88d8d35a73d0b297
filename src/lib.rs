//! Cross-ontology mapping refinement.
//!
//! The crate reconciles machine-predicted correspondences between biomedical
//! ontologies against trusted evidence, and synthesizes labeled
//! (`exact` / `broad` / `narrow`) relation datasets from known correspondences
//! and the term graphs of the ontologies involved.
//!
//! Everything is driven from an explicit [`app::AppContext`] built once per run:
//! ontology graphs and name tables are loaded up front and only read afterwards.

pub mod app;
pub mod config;
pub mod dataset;
mod errors;
pub mod logger;
pub mod mapping;
pub mod ontology;
pub mod reconcile;
pub mod relation;
pub mod tabular;

pub use errors::Error;

/// Application results options list
pub type Result<T, E = Error> = std::result::Result<T, E>;
