//! menudb-store
//!
//! MongoDB-backed document store. Pipelines arrive as aggregation JSON and
//! documents leave as the loosely-typed value tree of `menudb-core`.
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use mongodb::bson::Document as BsonDocument;
use mongodb::{Client, Collection};
use tracing::{debug, info};

use menudb_core::config::MongoSettings;
use menudb_core::traits::{DocumentStore, DocumentStream};

pub mod convert;

pub use convert::{from_bson_document, to_bson_pipeline};

/// One pooled client per process. Clones share the pool; close it
/// with [`MongoStore::shutdown`] on the way out.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    collection: Collection<BsonDocument>,
}

impl MongoStore {
    pub async fn connect(settings: &MongoSettings) -> Result<Self> {
        let uri = settings
            .uri
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| anyhow!("mongo.uri is not configured (APP_MONGO__URI)"))?;
        let database = settings
            .database
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| anyhow!("mongo.database is not configured (APP_MONGO__DATABASE)"))?;

        let client = Client::with_uri_str(uri).await.context("connecting to MongoDB")?;
        let collection = client.database(database).collection::<BsonDocument>(&settings.collection);
        info!(database, collection = %settings.collection, "document store ready");
        Ok(Self { client, collection })
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("document store closed");
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn aggregate(&self, pipeline: Vec<serde_json::Value>) -> Result<DocumentStream> {
        let stages = to_bson_pipeline(&pipeline)?;
        debug!(stages = stages.len(), "running aggregation");
        let cursor = self.collection.aggregate(stages).await?;
        Ok(cursor.map_ok(|doc| from_bson_document(&doc)).map_err(anyhow::Error::from).boxed())
    }
}
