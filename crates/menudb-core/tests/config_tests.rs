use std::fs;
use std::path::Path;
use tempfile::TempDir;

use menudb_core::config::{resolve_with_base, Config, EmbeddingProvider};

#[test]
fn defaults_apply_without_files() {
    let tmp = TempDir::new().unwrap();
    let settings = Config::load_in(tmp.path(), "dev").expect("config").settings().expect("settings");
    assert_eq!(settings.mongo.collection, "product_detail");
    assert_eq!(settings.embedding.model, "voyage-3.5");
    assert_eq!(settings.search.vector_index.as_deref(), Some("products_vector_index"));
    assert_eq!(settings.search.text_index.as_deref(), Some("full-text-search"));
    assert_eq!(settings.server.port, 5000);
}

#[test]
fn env_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[mongo]\ndatabase = \"menus\"\n\n[embedding]\nprovider = \"fake\"\ndimensions = 8\n",
    )
    .unwrap();
    fs::write(tmp.path().join("config.test.toml"), "[embedding]\ndimensions = 16\n\n[search]\ntext_index = \"\"\n").unwrap();

    let config = Config::load_in(tmp.path(), "test").expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.mongo.database.as_deref(), Some("menus"));
    assert_eq!(settings.embedding.provider, EmbeddingProvider::Fake);
    assert_eq!(settings.embedding.dimensions, 16);
    assert_eq!(settings.search.text_index.as_deref(), Some(""));

    let dims: usize = config.get("embedding.dimensions").expect("key");
    assert_eq!(dims, 16);
}

#[test]
fn production_requires_mongo_uri() {
    let tmp = TempDir::new().unwrap();
    assert!(Config::load_in(tmp.path(), "prod").is_err());

    fs::write(tmp.path().join("config.prod.toml"), "[mongo]\nuri = \"mongodb://db:27017\"\n").unwrap();
    assert!(Config::load_in(tmp.path(), "prod").is_ok());
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = Path::new("/srv/menudb");
    assert_eq!(resolve_with_base(base, "logs"), base.join("logs"));
    assert_eq!(resolve_with_base(base, "/var/log/menudb"), Path::new("/var/log/menudb"));
}
