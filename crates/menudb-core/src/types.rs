//! Domain types shared by the orchestrator, plan builder and transports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::document::{document_to_json, Document};
use crate::filter::FilterClauses;

pub const DEFAULT_LIMIT: usize = 5;
pub const MIN_LIMIT: usize = 1;
pub const MAX_LIMIT: usize = 25;
/// Breadth of the vector scan per returned result.
pub const CANDIDATES_PER_RESULT: usize = 20;

/// Which retrieval strategy a request uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Vector,
    Fulltext,
    Hybrid,
}

impl SearchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "vector" => Some(Self::Vector),
            "fulltext" => Some(Self::Fulltext),
            "hybrid" => Some(Self::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Fulltext => "fulltext",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn needs_vector(self) -> bool { matches!(self, Self::Vector | Self::Hybrid) }

    pub fn needs_title(self) -> bool { matches!(self, Self::Fulltext | Self::Hybrid) }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A request after validation: every field has its final, typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub mode: SearchMode,
    pub description: Option<String>,
    pub title: Option<String>,
    pub limit: usize,
    pub available: Option<bool>,
    pub max_price: Option<f64>,
    pub restaurant: Option<String>,
}

impl SearchParams {
    pub fn num_candidates(&self) -> usize { num_candidates(self.limit) }

    pub fn filters(&self) -> FilterClauses {
        crate::filter::build_filter(self.available, self.max_price, self.restaurant.as_deref())
    }
}

pub fn num_candidates(limit: usize) -> usize { limit * CANDIDATES_PER_RESULT }

/// Reply of the embedding collaborator. `embeddings` is `None` when the
/// service answered without an embeddings field at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingResponse {
    pub embeddings: Option<Vec<Vec<f32>>>,
}

/// One sanitized match, ready for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultDocument(Map<String, Value>);

impl ResultDocument {
    pub fn id(&self) -> Option<&str> { self.0.get("_id").and_then(Value::as_str) }

    pub fn restaurant_name(&self) -> Option<&str> { self.0.get("restaurantName").and_then(Value::as_str) }

    pub fn title(&self) -> Option<&str> { self.0.get("title").and_then(Value::as_str) }

    pub fn product(&self) -> Option<&Map<String, Value>> { self.0.get("product").and_then(Value::as_object) }

    pub fn score(&self) -> Option<f64> { self.0.get("score").and_then(Value::as_f64) }

    pub fn score_details(&self) -> Option<&Value> { self.0.get("scoreDetails") }

    /// Ranking score: plain `score`, or the fused `scoreDetails.value`.
    pub fn ranking_score(&self) -> Option<f64> {
        self.score()
            .or_else(|| self.score_details().and_then(|d| d.get("value")).and_then(Value::as_f64))
    }
}

impl From<&Document> for ResultDocument {
    fn from(doc: &Document) -> Self { Self(document_to_json(doc)) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub mode: SearchMode,
    pub results: Vec<ResultDocument>,
}
