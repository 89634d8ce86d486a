//! menudb-embed
//!
//! Embedding collaborators: a remote Voyage-style HTTP client and a
//! deterministic hash-based embedder for development and tests.
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::info;

use menudb_core::config::{EmbeddingProvider, EmbeddingSettings};
use menudb_core::traits::Embedder;

pub mod fake;
pub mod voyage;

pub use fake::FakeEmbedder;
pub use voyage::VoyageEmbedder;

/// Pick the embedder for this process. `APP_USE_FAKE_EMBEDDINGS=1` forces the
/// fake one regardless of the configured provider.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake || settings.provider == EmbeddingProvider::Fake {
        info!(dimensions = settings.dimensions, "using fake embedder");
        return Ok(Arc::new(FakeEmbedder::new(settings.dimensions)));
    }
    let Some(api_key) = settings.api_key.as_deref().filter(|k| !k.is_empty()) else {
        bail!("embedding.api_key is not configured (APP_EMBEDDING__API_KEY)");
    };
    info!(endpoint = %settings.endpoint, model = %settings.model, "using remote embedder");
    Ok(Arc::new(VoyageEmbedder::new(api_key, &settings.endpoint, settings.timeout_secs)?))
}
