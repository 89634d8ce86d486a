//! Search orchestration.
//!
//! Per request, strictly in order: validate → embed (vector/hybrid only) →
//! build plan → execute → sanitize. Any step may end the request; nothing
//! is retried and no other mode is tried as a fallback.

use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{debug, error, info};

use menudb_core::config::{EmbeddingSettings, SearchSettings};
use menudb_core::error::{ErrorResponse, Result, SearchError};
use menudb_core::request::SearchRequest;
use menudb_core::sanitize::sanitize_result;
use menudb_core::traits::{DocumentStore, Embedder};
use menudb_core::types::{ResultDocument, SearchParams, SearchResponse};

use crate::plan::{build_plan, PlanRequest, RetrievalPlan};

/// Names resolved once per process by the configuration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIndexes {
    pub embedding_model: String,
    pub vector_index: Option<String>,
    pub text_index: Option<String>,
}

impl SearchIndexes {
    pub fn from_settings(embedding: &EmbeddingSettings, search: &SearchSettings) -> Self {
        Self {
            embedding_model: embedding.model.clone(),
            vector_index: search.vector_index.clone(),
            text_index: search.text_index.clone(),
        }
    }
}

/// Holds only shared, read-only collaborators, so one instance serves any
/// number of concurrent requests.
pub struct SearchService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
    indexes: SearchIndexes,
}

impl SearchService {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn DocumentStore>, indexes: SearchIndexes) -> Self {
        Self { embedder, store, indexes }
    }

    /// Boundary entry point: failures come back as `{ message }` plus status.
    pub async fn handle(&self, request: &SearchRequest) -> std::result::Result<SearchResponse, ErrorResponse> {
        self.search(request).await.map_err(SearchError::into_response)
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let params = match request.validate() {
            Ok(params) => params,
            Err(e) => {
                info!(error = %e, "search request rejected");
                return Err(e.into());
            }
        };
        info!(
            mode = %params.mode,
            description_len = params.description.as_deref().map_or(0, str::len),
            title_len = params.title.as_deref().map_or(0, str::len),
            limit = params.limit,
            available = params.available.is_some(),
            max_price = params.max_price.is_some(),
            restaurant = params.restaurant.is_some(),
            "search request received"
        );

        let query_vector = if params.mode.needs_vector() { Some(self.query_vector(&params).await?) } else { None };

        let filters = params.filters();
        let plan = build_plan(&PlanRequest {
            mode: params.mode,
            query_vector: query_vector.as_deref(),
            title: params.title.as_deref(),
            limit: params.limit,
            num_candidates: params.num_candidates(),
            embedded_filter: filters.embedded.as_ref(),
            match_filter: filters.post_match.as_ref(),
            vector_index: self.indexes.vector_index.as_deref(),
            text_index: self.indexes.text_index.as_deref(),
        })
        .inspect_err(|e| error!(kind = e.kind(), error = %e, "could not build retrieval plan"))?;

        let mut results = self.execute(&plan).await?;
        results.truncate(params.limit);
        order_ties(&mut results);
        info!(mode = %params.mode, results = results.len(), "search completed");

        Ok(SearchResponse { mode: params.mode, results })
    }

    async fn query_vector(&self, params: &SearchParams) -> Result<Vec<f32>> {
        let description = params.description.clone().unwrap_or_default();
        debug!(model = %self.indexes.embedding_model, "requesting query embedding");
        let reply = self
            .embedder
            .embed(&[description], &self.indexes.embedding_model)
            .await
            .map_err(|e| embedding_failure(&format!("{e:#}")))?;

        let Some(embeddings) = reply.embeddings else {
            return Err(embedding_failure("la respuesta no contiene embeddings"));
        };
        match embeddings.into_iter().next() {
            Some(vector) if !vector.is_empty() => Ok(vector),
            _ => Err(embedding_failure("la respuesta no contiene ningún vector")),
        }
    }

    async fn execute(&self, plan: &RetrievalPlan) -> Result<Vec<ResultDocument>> {
        debug!(stages = plan.len(), pipeline = %plan.redacted_json(), "executing retrieval plan");
        let outcome: anyhow::Result<Vec<ResultDocument>> = async {
            let stream = self.store.aggregate(plan.to_json()).await?;
            stream.map_ok(|doc| sanitize_result(&doc)).try_collect().await
        }
        .await;
        outcome.map_err(|e| {
            error!(error = %format!("{e:#}"), pipeline = %plan.redacted_json(), "retrieval failed");
            SearchError::Retrieval(format!("{e:#}"))
        })
    }
}

fn embedding_failure(cause: &str) -> SearchError {
    error!(cause, "embedding lookup failed");
    SearchError::Embedding(cause.to_string())
}

/// Equal adjacent scores are ordered by identifier; store order between
/// different scores is kept.
fn order_ties(results: &mut [ResultDocument]) {
    for run in results.chunk_by_mut(|a, b| a.ranking_score() == b.ranking_score()) {
        run.sort_by(|a, b| a.id().cmp(&b.id()));
    }
}
