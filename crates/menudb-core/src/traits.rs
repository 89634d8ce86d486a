use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::document::Document;
use crate::types::EmbeddingResponse;

/// Lazily drained documents of one aggregation.
pub type DocumentStream = BoxStream<'static, anyhow::Result<Document>>;

/// Remote text-embedding service: text in, fixed-length vectors out.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String], model: &str) -> anyhow::Result<EmbeddingResponse>;
}

/// Document store that executes aggregation pipelines.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn aggregate(&self, pipeline: Vec<serde_json::Value>) -> anyhow::Result<DocumentStream>;
}
