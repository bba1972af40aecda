use crate::app::App;
use crate::constants::classify as classify_constants;
use crate::errors::ResolveError;
use crate::services::brand_resolver::ResolveRequest;
use crate::services::classifier::{confidence_band, ClassifyOptions};
use crate::stores::PostgresAliasStore;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pantrymatch", about = "Grocery item classification and brand resolution")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a free-text grocery item name.
    Classify {
        name: String,
        #[arg(long, default_value_t = classify_constants::DEFAULT_LIMIT)]
        limit: usize,
        #[arg(long, default_value_t = classify_constants::DEFAULT_MIN_CONFIDENCE)]
        min_confidence: f64,
    },
    /// Print seed dictionary statistics.
    Stats,
    /// Resolve a raw receipt string to a brand via DATABASE_URL.
    Resolve {
        name: String,
        #[arg(long)]
        store_id: Option<Uuid>,
        #[arg(long)]
        brand_id: Option<Uuid>,
    },
}

pub async fn run() -> Result<(), ResolveError> {
    let cli = Cli::parse();
    let app = App::initialize()?;

    match cli.command {
        Command::Classify {
            name,
            limit,
            min_confidence,
        } => {
            let options = ClassifyOptions {
                limit,
                min_confidence,
            };
            let results: Vec<serde_json::Value> = app
                .classifier
                .classify(&name, &options)
                .into_iter()
                .map(|result| {
                    let band = confidence_band(result.confidence);
                    let mut value = serde_json::to_value(&result).unwrap_or_else(|_| json!({}));
                    if let Some(map) = value.as_object_mut() {
                        map.insert("band".to_string(), json!(band));
                    }
                    value
                })
                .collect();
            print_json(&json!({ "results": results }))?;
        }
        Command::Stats => {
            print_json(&app.classifier.index().stats())?;
        }
        Command::Resolve {
            name,
            store_id,
            brand_id,
        } => {
            let database_url = std::env::var("DATABASE_URL").map_err(|_| {
                ResolveError::invalid_params("DATABASE_URL must be set for resolve")
            })?;
            let store = Arc::new(PostgresAliasStore::connect(&database_url).await?);
            let app = app.with_alias_store(store);
            let resolver = app
                .resolver
                .as_ref()
                .ok_or_else(|| ResolveError::internal("resolver not wired"))?;
            let resolution = resolver
                .resolve(&ResolveRequest {
                    raw_name: name,
                    store_id,
                    brand_id,
                })
                .await?;
            print_json(&json!({
                "httpStatus": resolution.http_status(),
                "body": resolution.to_response(),
            }))?;
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), ResolveError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| ResolveError::internal(err.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
