//! Aggregation stage vocabulary.
//!
//! Stages are typed so plans can be inspected in tests, and rendered to the
//! store's aggregation syntax only at the edge (`Stage::to_json`).

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::filter::FilterPredicate;

#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearchStage {
    pub index: String,
    pub path: String,
    pub query_vector: Vec<f32>,
    pub num_candidates: usize,
    pub limit: usize,
    pub filter: Option<FilterPredicate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSearchStage {
    pub index: String,
    pub path: String,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    None,
}

impl Normalization {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
        }
    }
}

/// One weighted term of a fused score: `weight × $$pipeline`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTerm {
    pub pipeline: String,
    pub weight: f64,
}

/// Weighted sum over the named sub-pipeline scores.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationExpression {
    pub terms: Vec<WeightedTerm>,
}

impl CombinationExpression {
    pub fn weighted_sum(terms: impl IntoIterator<Item = (impl Into<String>, f64)>) -> Self {
        Self {
            terms: terms
                .into_iter()
                .map(|(pipeline, weight)| WeightedTerm { pipeline: pipeline.into(), weight })
                .collect(),
        }
    }

    pub fn weight_of(&self, pipeline: &str) -> Option<f64> {
        self.terms.iter().find(|t| t.pipeline == pipeline).map(|t| t.weight)
    }

    /// Evaluate locally against per-pipeline scores. A pipeline that did not
    /// score the document contributes zero.
    pub fn evaluate(&self, scores: &HashMap<&str, f64>) -> f64 {
        self.terms
            .iter()
            .map(|t| t.weight * scores.get(t.pipeline.as_str()).copied().unwrap_or(0.0))
            .sum()
    }

    pub fn to_json(&self) -> Value {
        let operands: Vec<Value> = self
            .terms
            .iter()
            .map(|t| {
                let var = format!("$${}", t.pipeline);
                if (t.weight - 1.0).abs() < f64::EPSILON {
                    Value::String(var)
                } else {
                    json!({ "$multiply": [t.weight, var] })
                }
            })
            .collect();
        json!({ "$add": operands })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreFusionStage {
    /// Named sub-pipelines, in declaration order.
    pub pipelines: Vec<(String, Vec<Stage>)>,
    pub normalization: Normalization,
    pub combination: CombinationExpression,
    pub score_details: bool,
}

impl ScoreFusionStage {
    pub fn pipeline(&self, name: &str) -> Option<&[Stage]> {
        self.pipelines.iter().find(|(n, _)| n == name).map(|(_, stages)| stages.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectField {
    Include,
    /// `{ "$meta": <key> }`
    Meta(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub fields: Vec<(String, ProjectField)>,
}

impl Projection {
    pub fn include(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), ProjectField::Include));
        self
    }

    pub fn meta(mut self, field: impl Into<String>, key: impl Into<String>) -> Self {
        self.fields.push((field.into(), ProjectField::Meta(key.into())));
        self
    }

    pub fn get(&self, field: &str) -> Option<&ProjectField> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, p)| p)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    VectorSearch(VectorSearchStage),
    Search(TextSearchStage),
    ScoreFusion(ScoreFusionStage),
    Match(FilterPredicate),
    ExcludeNull { field: String },
    Project(Projection),
    Limit(usize),
    Group { key: String },
    Sort { field: String, ascending: bool },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::VectorSearch(_) => "$vectorSearch",
            Self::Search(_) => "$search",
            Self::ScoreFusion(_) => "$scoreFusion",
            Self::Match(_) | Self::ExcludeNull { .. } => "$match",
            Self::Project(_) => "$project",
            Self::Limit(_) => "$limit",
            Self::Group { .. } => "$group",
            Self::Sort { .. } => "$sort",
        }
    }

    pub fn to_json(&self) -> Value {
        self.render(false)
    }

    /// Same as `to_json`, with query vectors replaced by a length marker.
    pub fn redacted_json(&self) -> Value {
        self.render(true)
    }

    fn render(&self, redact: bool) -> Value {
        let body = match self {
            Self::VectorSearch(s) => {
                let vector = if redact {
                    Value::String(format!("<{} floats>", s.query_vector.len()))
                } else {
                    json!(s.query_vector)
                };
                let mut body = Map::new();
                body.insert("index".into(), json!(s.index));
                body.insert("path".into(), json!(s.path));
                body.insert("queryVector".into(), vector);
                body.insert("numCandidates".into(), json!(s.num_candidates));
                body.insert("limit".into(), json!(s.limit));
                if let Some(filter) = &s.filter {
                    body.insert("filter".into(), filter.to_json());
                }
                Value::Object(body)
            }
            Self::Search(s) => json!({
                "index": s.index,
                "text": { "query": s.query, "path": s.path },
            }),
            Self::ScoreFusion(s) => {
                let pipelines: Map<String, Value> = s
                    .pipelines
                    .iter()
                    .map(|(name, stages)| {
                        let rendered = stages.iter().map(|st| st.render(redact)).collect::<Vec<_>>();
                        (name.clone(), Value::Array(rendered))
                    })
                    .collect();
                json!({
                    "input": { "pipelines": pipelines, "normalization": s.normalization.as_str() },
                    "combination": { "method": "expression", "expression": s.combination.to_json() },
                    "scoreDetails": s.score_details,
                })
            }
            Self::Match(predicate) => predicate.to_json(),
            Self::ExcludeNull { field } => {
                let mut body = Map::new();
                body.insert(field.clone(), json!({ "$ne": null }));
                Value::Object(body)
            }
            Self::Project(p) => {
                let body: Map<String, Value> = p
                    .fields
                    .iter()
                    .map(|(field, kind)| {
                        let v = match kind {
                            ProjectField::Include => json!(1),
                            ProjectField::Meta(key) => json!({ "$meta": key }),
                        };
                        (field.clone(), v)
                    })
                    .collect();
                Value::Object(body)
            }
            Self::Limit(n) => json!(n),
            Self::Group { key } => json!({ "_id": format!("${key}") }),
            Self::Sort { field, ascending } => {
                let mut body = Map::new();
                body.insert(field.clone(), json!(if *ascending { 1 } else { -1 }));
                Value::Object(body)
            }
        };
        let mut stage = Map::new();
        stage.insert(self.name().to_string(), body);
        Value::Object(stage)
    }
}
