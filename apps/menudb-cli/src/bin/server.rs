//! HTTP surface for product search.
//!
//! Routes:
//! - `POST /api/search`      → `{ mode, results }` or `{ message }` (400/500)
//! - `GET  /api/restaurants` → `["name", ...]`
//! - `GET  /health`          → `{ status: "ok" }`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use menudb_core::config::Config;
use menudb_core::error::ErrorResponse;
use menudb_core::logging::init_logging;
use menudb_core::request::SearchRequest;
use menudb_core::types::SearchResponse;
use menudb_embed::get_default_embedder;
use menudb_hybrid::{CatalogLister, SearchIndexes, SearchService};
use menudb_store::MongoStore;

#[derive(Clone)]
struct AppState {
    search: Arc<SearchService>,
    catalog: Arc<CatalogLister>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;
    let _guard = init_logging(&settings.logging)?;

    let store = MongoStore::connect(&settings.mongo).await?;
    let shared_store = Arc::new(store.clone());
    let embedder = get_default_embedder(&settings.embedding)?;
    let indexes = SearchIndexes::from_settings(&settings.embedding, &settings.search);

    let state = AppState {
        search: Arc::new(SearchService::new(embedder, shared_store.clone(), indexes)),
        catalog: Arc::new(CatalogLister::new(shared_store)),
    };
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/search", post(search_handler))
        .route("/api/restaurants", get(restaurants_handler))
        .with_state(state);

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, "menudb-server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    store.shutdown().await;
    info!("menudb-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn health_handler() -> Json<serde_json::Value> { Json(json!({ "status": "ok" })) }

async fn search_handler(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(request) = body.map_err(|e| {
        info!(error = %e, "malformed search body");
        AppError(ErrorResponse::new(400, "El cuerpo de la solicitud debe ser un objeto JSON válido."))
    })?;
    let response = state.search.handle(&request).await.map_err(AppError)?;
    Ok(Json(response))
}

async fn restaurants_handler(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let names = state
        .catalog
        .list_restaurants()
        .await
        .map_err(|e| AppError(e.into_response()))?;
    Ok(Json(names))
}

struct AppError(ErrorResponse);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), message = %self.0.message, "request failed");
        }
        (status, Json(self.0)).into_response()
    }
}
