use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;

use menudb_core::config::Config;
use menudb_core::logging::init_logging;
use menudb_core::request::SearchRequest;
use menudb_embed::get_default_embedder;
use menudb_hybrid::{CatalogLister, SearchIndexes, SearchService};
use menudb_store::MongoStore;

#[derive(Parser)]
#[command(name = "menudb", about = "Search the product catalog from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one search and print the JSON response.
    Search {
        /// Free-text description (vector and hybrid modes).
        description: Option<String>,
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        /// `true` or `false`.
        #[arg(long)]
        available: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        #[arg(long)]
        restaurant: Option<String>,
    },
    /// Print every restaurant name, one per line.
    Restaurants,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;
    let settings = config.settings()?;
    let _guard = init_logging(&settings.logging)?;
    let cli = Cli::parse();

    let store = MongoStore::connect(&settings.mongo).await?;
    let shared_store = Arc::new(store.clone());

    let outcome = match cli.command {
        Command::Search { description, mode, title, limit, available, max_price, restaurant } => {
            let request = SearchRequest {
                mode,
                description,
                title,
                limit: limit.map(Value::String),
                available: available.map(Value::String),
                max_price: max_price.map(Value::String),
                restaurant,
            };
            let embedder = get_default_embedder(&settings.embedding)?;
            let indexes = SearchIndexes::from_settings(&settings.embedding, &settings.search);
            let service = SearchService::new(embedder, shared_store, indexes);
            match service.handle(&request).await {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Restaurants => match CatalogLister::new(shared_store).list_restaurants().await {
            Ok(names) => {
                names.iter().for_each(|name| println!("{name}"));
                Ok(())
            }
            Err(e) => Err(e.into_response()),
        },
    };

    store.shutdown().await;
    outcome.map_err(|e| anyhow::anyhow!("{} ({})", e.message, e.status))
}
