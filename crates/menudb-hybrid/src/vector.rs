//! Similarity stage over the description embeddings.

use menudb_core::filter::FilterPredicate;
use menudb_core::pipeline::{Stage, VectorSearchStage};

pub const EMBEDDING_PATH: &str = "emb_description";
pub const SCORE_META: &str = "vectorSearchScore";

pub fn similarity_stage(
    index: &str,
    query_vector: &[f32],
    limit: usize,
    num_candidates: usize,
    filter: Option<&FilterPredicate>,
) -> Stage {
    Stage::VectorSearch(VectorSearchStage {
        index: index.to_string(),
        path: EMBEDDING_PATH.to_string(),
        query_vector: query_vector.to_vec(),
        num_candidates,
        limit,
        filter: filter.cloned(),
    })
}
