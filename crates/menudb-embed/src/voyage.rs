//! HTTP client for Voyage-compatible embedding endpoints.
//!
//! Single-shot: no retries, the caller decides what a failure means.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use menudb_core::traits::Embedder;
use menudb_core::types::EmbeddingResponse;

pub struct VoyageEmbedder {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct EmbedReply {
    pub data: Option<Vec<EmbedData>>,
}

#[derive(Debug, Deserialize)]
pub struct EmbedData {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

impl VoyageEmbedder {
    pub fn new(api_key: &str, endpoint: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building embedding HTTP client")?;
        Ok(Self { client, api_key: api_key.to_string(), endpoint: endpoint.to_string() })
    }
}

/// Turn a decoded reply into vectors ordered by their `index`. A reply
/// without `data` yields `embeddings: None`.
pub fn into_response(reply: EmbedReply) -> EmbeddingResponse {
    let embeddings = reply.data.map(|mut data| {
        data.sort_by_key(|d| d.index);
        data.into_iter().map(|d| d.embedding).collect()
    });
    EmbeddingResponse { embeddings }
}

#[async_trait]
impl Embedder for VoyageEmbedder {
    async fn embed(&self, texts: &[String], model: &str) -> Result<EmbeddingResponse> {
        let body = EmbedRequest { input: texts, model, input_type: "query" };
        debug!(texts = texts.len(), model, "requesting embeddings");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP error: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("API returned {status}: {body}"));
        }

        let reply: EmbedReply = response.json().await.map_err(|e| anyhow!("JSON parse error: {e}"))?;
        Ok(into_response(reply))
    }
}
