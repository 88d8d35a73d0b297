//! Graph context and lexical similarity of a correspondence.

pub mod context;
pub mod similarity;

pub use context::{RelationContext, RelationContextExtractor};
pub use similarity::{
    levenshtein_distance, normalized_edit_similarity, SimilarityBucket, SimilaritySignal,
};
