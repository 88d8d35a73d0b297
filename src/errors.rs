//! # Application Error Handling

use crate::{
    config::ConfigError,
    dataset::DatasetError,
    mapping::MappingError,
    ontology::{CurieError, OntologyError},
    tabular::TableError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Curie(#[from] CurieError),

    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Any(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn wrap(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Any(Box::new(err))
    }
}
