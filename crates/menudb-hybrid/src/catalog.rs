use futures::TryStreamExt;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{error, info};

use menudb_core::document::Value;
use menudb_core::error::{Result, SearchError};
use menudb_core::pipeline::Stage;
use menudb_core::traits::DocumentStore;

/// Distinct restaurant names known to the catalog.
pub struct CatalogLister {
    store: Arc<dyn DocumentStore>,
}

impl CatalogLister {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    pub fn pipeline() -> Vec<Stage> {
        vec![
            Stage::Group { key: "restaurantName".into() },
            Stage::ExcludeNull { field: "_id".into() },
            Stage::Sort { field: "_id".into(), ascending: true },
        ]
    }

    /// Names ascending, without duplicates or nulls. The store already groups
    /// and sorts; the result is normalized again so it never depends on that.
    pub async fn list_restaurants(&self) -> Result<Vec<String>> {
        let pipeline = Self::pipeline().iter().map(Stage::to_json).collect();
        let outcome: anyhow::Result<BTreeSet<String>> = async {
            let stream = self.store.aggregate(pipeline).await?;
            stream
                .try_fold(BTreeSet::new(), |mut names, doc| async move {
                    if let Some(Value::String(name)) = doc.get("_id") {
                        names.insert(name.clone());
                    }
                    Ok(names)
                })
                .await
        }
        .await;

        let names = outcome.map_err(|e| {
            error!(error = %format!("{e:#}"), "listing restaurants failed");
            SearchError::Retrieval(format!("{e:#}"))
        })?;
        info!(restaurants = names.len(), "restaurants listed");
        Ok(names.into_iter().collect())
    }
}
