//! Correspondences between ontology terms and their flat-file formats.

pub mod entities;
pub mod formats;

pub use entities::{dedup, make_undirected, Mapping, MappingKey, MatchPredicate};
pub use formats::{
    biomappings_table, biomappings_to_sssom, read_biomappings, read_sssom, retain_predicates,
    sssom_table, sssom_to_biomappings, MappingError,
};
