use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use menudb_core::document::{Document, Value};
use menudb_core::request::SearchRequest;
use menudb_core::traits::{DocumentStore, DocumentStream, Embedder};
use menudb_core::types::{EmbeddingResponse, SearchMode};
use menudb_hybrid::{CatalogLister, SearchIndexes, SearchService};

#[derive(Default)]
struct StubEmbedder {
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    reply: Option<EmbeddingResponse>,
    fail: bool,
}

impl StubEmbedder {
    fn fixed() -> Self {
        Self { reply: Some(EmbeddingResponse { embeddings: Some(vec![vec![0.1, 0.2, 0.3]]) }), ..Self::default() }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[String], _model: &str) -> anyhow::Result<EmbeddingResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.lock().unwrap().extend(texts.iter().cloned());
        if self.fail {
            anyhow::bail!("timeout after 30s");
        }
        Ok(self.reply.clone().unwrap_or_default())
    }
}

#[derive(Default)]
struct StubStore {
    calls: AtomicUsize,
    pipelines: Mutex<Vec<Vec<Json>>>,
    docs: Vec<Document>,
    fail: bool,
}

impl StubStore {
    fn with_docs(docs: Vec<Document>) -> Self { Self { docs, ..Self::default() } }
}

#[async_trait]
impl DocumentStore for StubStore {
    async fn aggregate(&self, pipeline: Vec<Json>) -> anyhow::Result<DocumentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pipelines.lock().unwrap().push(pipeline);
        if self.fail {
            anyhow::bail!("index not found: products_vector_index");
        }
        Ok(futures::stream::iter(self.docs.clone().into_iter().map(Ok)).boxed())
    }
}

fn object(value: Json) -> Document {
    match Value::from_json(&value) {
        Value::Object(doc) => doc,
        _ => panic!("expected object"),
    }
}

fn product_doc(id: &str, score: Value) -> Document {
    let mut doc = object(json!({
        "restaurantName": "Pardos Chicken",
        "product": { "name": "Pollo crujiente", "price": { "amount": 21 }, "available": true },
        "title": "McCombos Signature (Cena)",
    }));
    doc.insert("_id".into(), Value::ObjectId(id.into()));
    doc.insert("score".into(), score);
    doc
}

fn indexes() -> SearchIndexes {
    SearchIndexes {
        embedding_model: "voyage-3.5".into(),
        vector_index: Some("products_vector_index".into()),
        text_index: Some("full-text-search".into()),
    }
}

fn service(embedder: &Arc<StubEmbedder>, store: &Arc<StubStore>) -> SearchService {
    SearchService::new(embedder.clone(), store.clone(), indexes())
}

fn request(body: Json) -> SearchRequest { serde_json::from_value(body).unwrap() }

#[tokio::test]
async fn vector_search_returns_sanitized_documents() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::with_docs(vec![
        product_doc("665f00000000000000000001", Value::Decimal("0.91".into())),
        product_doc("665f00000000000000000002", Value::Double(0.84)),
    ]));

    let response = service(&embedder, &store)
        .handle(&request(json!({ "mode": "vector", "description": "pollo crujiente", "limit": 3 })))
        .await
        .expect("search");

    assert_eq!(response.mode, SearchMode::Vector);
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].id(), Some("665f00000000000000000001"));
    assert_eq!(response.results[0].score(), Some(0.91));
    assert_eq!(response.results[1].score(), Some(0.84));
    assert_eq!(response.results[0].product().expect("product")["price"]["amount"], json!(21.0));

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*embedder.texts.lock().unwrap(), vec!["pollo crujiente".to_string()]);

    let pipelines = store.pipelines.lock().unwrap();
    let stage = &pipelines[0][0]["$vectorSearch"];
    assert_eq!(stage["limit"], json!(3));
    assert_eq!(stage["numCandidates"], json!(60));
    assert_eq!(stage["queryVector"].as_array().map(Vec::len), Some(3));

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["mode"], json!("vector"));
    assert_eq!(body["results"][1]["_id"], json!("665f00000000000000000002"));
}

#[tokio::test]
async fn empty_title_is_rejected_before_the_store() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::default());

    let err = service(&embedder, &store)
        .handle(&request(json!({ "mode": "fulltext", "title": "" })))
        .await
        .unwrap_err();

    assert_eq!(err.status, 400);
    assert!(err.message.starts_with("El título es obligatorio"), "{}", err.message);
    assert_eq!(serde_json::to_value(&err).unwrap(), json!({ "message": err.message }));
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_price_is_rejected_before_embedding() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::default());

    let err = service(&embedder, &store)
        .handle(&request(json!({ "description": "pollo", "maxPrice": "abc" })))
        .await
        .unwrap_err();

    assert_eq!(err.status, 400);
    assert!(err.message.contains("maxPrice") && err.message.contains("abc"), "{}", err.message);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fulltext_search_skips_embedding() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::with_docs(vec![product_doc("665f00000000000000000003", Value::Double(3.2))]));

    let response = service(&embedder, &store)
        .handle(&request(json!({ "mode": "fulltext", "title": "McCombos", "available": true })))
        .await
        .expect("search");

    assert_eq!(response.results.len(), 1);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    let pipelines = store.pipelines.lock().unwrap();
    assert_eq!(pipelines[0][1], json!({ "$match": { "product.available": { "$eq": true } } }));
}

#[tokio::test]
async fn hybrid_search_exposes_score_details() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let mut doc = product_doc("665f00000000000000000004", Value::Null);
    doc.shift_remove("score");
    doc.insert(
        "scoreDetails".into(),
        Value::from_json(&json!({ "value": 9.4, "details": [
            { "inputPipelineName": "vectorPipeline", "value": 0.9 },
            { "inputPipelineName": "fullTextPipeline", "value": 0.4 },
        ]})),
    );
    let store = Arc::new(StubStore::with_docs(vec![doc]));

    let response = service(&embedder, &store)
        .handle(&request(json!({ "mode": "hybrid", "description": "pollo", "title": "McCombos", "maxPrice": 30 })))
        .await
        .expect("search");

    assert_eq!(response.mode, SearchMode::Hybrid);
    let result = &response.results[0];
    assert_eq!(result.score(), None);
    assert_eq!(result.score_details().expect("details")["details"][0]["value"], json!(0.9));

    let pipelines = store.pipelines.lock().unwrap();
    let names: Vec<_> = pipelines[0].iter().filter_map(|s| s.as_object()).flat_map(|o| o.keys().cloned()).collect();
    assert_eq!(names, vec!["$scoreFusion", "$match", "$project", "$limit"]);
}

#[tokio::test]
async fn embedding_failures_are_reported_as_server_errors() {
    let store = Arc::new(StubStore::default());

    let failing = Arc::new(StubEmbedder { fail: true, ..StubEmbedder::default() });
    let err = service(&failing, &store).handle(&request(json!({ "description": "pollo" }))).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert!(err.message.contains("timeout after 30s"), "{}", err.message);

    let no_field = Arc::new(StubEmbedder { reply: Some(EmbeddingResponse { embeddings: None }), ..StubEmbedder::default() });
    let err = service(&no_field, &store).handle(&request(json!({ "description": "pollo" }))).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert!(err.message.contains("embeddings"), "{}", err.message);

    let empty = Arc::new(StubEmbedder { reply: Some(EmbeddingResponse { embeddings: Some(vec![]) }), ..StubEmbedder::default() });
    let err = service(&empty, &store).handle(&request(json!({ "description": "pollo" }))).await.unwrap_err();
    assert_eq!(err.status, 500);

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_failures_are_not_retried() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore { fail: true, ..StubStore::default() });

    let err = service(&embedder, &store).handle(&request(json!({ "description": "pollo" }))).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert!(err.message.contains("index not found"), "{}", err.message);
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unset_index_is_a_configuration_failure() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::default());
    let svc = SearchService::new(embedder.clone(), store.clone(), SearchIndexes { text_index: None, ..indexes() });

    let err = svc.handle(&request(json!({ "mode": "fulltext", "title": "McCombos" }))).await.unwrap_err();
    assert_eq!(err.status, 500);
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn equal_scores_are_ordered_by_id() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::with_docs(vec![
        product_doc("c", Value::Double(0.9)),
        product_doc("b", Value::Double(0.7)),
        product_doc("a", Value::Double(0.7)),
        product_doc("d", Value::Double(0.5)),
    ]));

    let response = service(&embedder, &store).handle(&request(json!({ "description": "pollo", "limit": 10 }))).await.expect("search");
    let ids: Vec<_> = response.results.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["c", "a", "b", "d"]);
}

fn fused_doc(id: &str, value: f64) -> Document {
    let mut doc = product_doc(id, Value::Null);
    doc.shift_remove("score");
    doc.insert("scoreDetails".into(), Value::from_json(&json!({ "value": value, "details": [] })));
    doc
}

#[tokio::test]
async fn equal_fused_scores_are_ordered_by_id() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let store = Arc::new(StubStore::with_docs(vec![fused_doc("b", 2.0), fused_doc("a", 2.0), fused_doc("c", 1.0)]));

    let response = service(&embedder, &store)
        .handle(&request(json!({ "mode": "hybrid", "description": "pollo", "title": "McCombos" })))
        .await
        .expect("search");
    let ids: Vec<_> = response.results.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(response.results[0].ranking_score(), Some(2.0));
}

#[tokio::test]
async fn limit_bounds_results_even_if_the_store_overshoots() {
    let embedder = Arc::new(StubEmbedder::fixed());
    let docs = (0..8).map(|i| product_doc(&format!("id{i}"), Value::Double(1.0 - f64::from(i) * 0.1))).collect();
    let store = Arc::new(StubStore::with_docs(docs));

    let response = service(&embedder, &store).handle(&request(json!({ "description": "pollo", "limit": "2" }))).await.expect("search");
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn restaurants_are_distinct_sorted_and_non_null() {
    let store = Arc::new(StubStore::with_docs(vec![
        object(json!({ "_id": "Z-Diner" })),
        object(json!({ "_id": "A-Cafe" })),
        object(json!({ "_id": "A-Cafe" })),
        object(json!({ "_id": null })),
    ]));

    let names = CatalogLister::new(store.clone()).list_restaurants().await.expect("restaurants");
    assert_eq!(names, vec!["A-Cafe".to_string(), "Z-Diner".to_string()]);

    let pipelines = store.pipelines.lock().unwrap();
    assert_eq!(
        pipelines[0],
        vec![
            json!({ "$group": { "_id": "$restaurantName" } }),
            json!({ "$match": { "_id": { "$ne": null } } }),
            json!({ "$sort": { "_id": 1 } }),
        ]
    );
}
