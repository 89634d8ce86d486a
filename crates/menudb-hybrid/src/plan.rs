//! Retrieval plan construction.
//!
//! A plan is built fresh per request and is a pure function of its inputs.
//!
//! - vector:   `$vectorSearch` (filter embedded) → `$project` score → `$limit`
//! - fulltext: `$search` → `$match`? → `$project` score → `$limit`
//! - hybrid:   `$scoreFusion` (vector + text) → `$match`? → `$project` details → `$limit`
//!
//! Lexical and fused stages cannot take an embedded filter, so those modes
//! filter with a standalone `$match` after retrieval.

use serde_json::Value;

use menudb_core::error::{Result, SearchError};
use menudb_core::filter::FilterPredicate;
use menudb_core::pipeline::{Projection, Stage};
use menudb_core::types::SearchMode;

use crate::fusion::{fusion_stage, DETAILS_META};
use crate::text::{self, lexical_stage};
use crate::vector::{self, similarity_stage};

/// Everything the builder needs; nothing else influences the plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub mode: SearchMode,
    pub query_vector: Option<&'a [f32]>,
    pub title: Option<&'a str>,
    pub limit: usize,
    pub num_candidates: usize,
    pub embedded_filter: Option<&'a FilterPredicate>,
    pub match_filter: Option<&'a FilterPredicate>,
    pub vector_index: Option<&'a str>,
    pub text_index: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalPlan {
    stages: Vec<Stage>,
}

impl RetrievalPlan {
    pub fn new(stages: Vec<Stage>) -> Self { Self { stages } }

    pub fn stages(&self) -> &[Stage] { &self.stages }

    pub fn len(&self) -> usize { self.stages.len() }

    pub fn is_empty(&self) -> bool { self.stages.is_empty() }

    pub fn to_json(&self) -> Vec<Value> { self.stages.iter().map(Stage::to_json).collect() }

    /// Pipeline for logs: query vectors replaced by their length.
    pub fn redacted_json(&self) -> Value { Value::Array(self.stages.iter().map(Stage::redacted_json).collect()) }
}

pub fn build_plan(req: &PlanRequest<'_>) -> Result<RetrievalPlan> {
    let projection = Projection::default().include("_id").include("restaurantName").include("product").include("title");

    let mut stages = match req.mode {
        SearchMode::Vector => {
            let index = required_index(req.vector_index, "vectorial")?;
            let query_vector = required_vector(req)?;
            vec![
                similarity_stage(index, query_vector, req.limit, req.num_candidates, req.embedded_filter),
                Stage::Project(projection.meta("score", vector::SCORE_META)),
            ]
        }
        SearchMode::Fulltext => {
            let index = required_index(req.text_index, "de texto completo")?;
            let title = required_title(req)?;
            let mut stages = vec![lexical_stage(index, title)];
            push_match(&mut stages, req.match_filter);
            stages.push(Stage::Project(projection.meta("score", text::SCORE_META)));
            stages
        }
        SearchMode::Hybrid => {
            let vector_index = required_index(req.vector_index, "vectorial")?;
            let text_index = required_index(req.text_index, "de texto completo")?;
            let query_vector = required_vector(req)?;
            let title = required_title(req)?;
            let similarity = similarity_stage(vector_index, query_vector, req.limit, req.num_candidates, None);
            let mut stages = vec![fusion_stage(similarity, lexical_stage(text_index, title))];
            push_match(&mut stages, req.match_filter);
            stages.push(Stage::Project(projection.meta("scoreDetails", DETAILS_META)));
            stages
        }
    };
    stages.push(Stage::Limit(req.limit));

    Ok(RetrievalPlan::new(stages))
}

fn required_vector<'a>(req: &PlanRequest<'a>) -> Result<&'a [f32]> {
    req.query_vector
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SearchError::Plan(format!("el modo '{}' requiere un vector de consulta", req.mode)))
}

fn required_title<'a>(req: &PlanRequest<'a>) -> Result<&'a str> {
    req.title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SearchError::Plan(format!("el modo '{}' requiere un título", req.mode)))
}

fn required_index<'a>(name: Option<&'a str>, kind: &str) -> Result<&'a str> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SearchError::Configuration(format!("no hay un índice {kind} configurado")))
}

fn push_match(stages: &mut Vec<Stage>, filter: Option<&FilterPredicate>) {
    if let Some(filter) = filter {
        stages.push(Stage::Match(filter.clone()));
    }
}
