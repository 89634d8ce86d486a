//! Score fusion of the similarity and lexical sub-pipelines.
//!
//! The fused score is `10 × similarity + 1 × lexical` over raw (unnormalized)
//! component scores. Per-component details are always requested.

use menudb_core::pipeline::{CombinationExpression, Normalization, ScoreFusionStage, Stage};

pub const VECTOR_PIPELINE: &str = "vectorPipeline";
pub const TEXT_PIPELINE: &str = "fullTextPipeline";
pub const VECTOR_WEIGHT: f64 = 10.0;
pub const TEXT_WEIGHT: f64 = 1.0;
pub const DETAILS_META: &str = "scoreDetails";

pub fn combination() -> CombinationExpression {
    CombinationExpression::weighted_sum([(VECTOR_PIPELINE, VECTOR_WEIGHT), (TEXT_PIPELINE, TEXT_WEIGHT)])
}

pub fn fusion_stage(similarity: Stage, lexical: Stage) -> Stage {
    Stage::ScoreFusion(ScoreFusionStage {
        pipelines: vec![
            (VECTOR_PIPELINE.to_string(), vec![similarity]),
            (TEXT_PIPELINE.to_string(), vec![lexical]),
        ],
        normalization: Normalization::None,
        combination: combination(),
        score_details: true,
    })
}
