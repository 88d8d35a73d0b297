//! Ontology term graphs and name resolution.
//!
//! The module keeps the graph model, the traversal primitives and the
//! id → label resolution independent from how ontology files are acquired or
//! parsed. Infrastructure plugs in through [`GraphProvider`] and [`NameSource`].

pub mod entities;
pub mod names;
pub mod registry;
pub mod repositories;
pub mod service;
pub mod traversal;
pub mod value_objects;

pub use entities::{OntologyError, OntologyGraph, Term};
pub use names::{NameResolver, NameTable};
pub use registry::PrefixRegistry;
pub use repositories::{GraphProvider, NameSource, TermGraph};
pub use service::{GraphCatalog, InMemoryResources};
pub use traversal::{
    bounded_ancestors, bounded_descendants, top_k_named_relations, BoundedBfs, Direction,
    NamedRelations,
};
pub use value_objects::{Curie, CurieError};
