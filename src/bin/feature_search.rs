//! Feature Search CLI
//!
//! Resolves a natural-language query against a feature catalog and prints
//! the JSON response envelope.
//!
//! Usage:
//!   cargo run --features cli --bin feature_search -- "show me Tycho crater"
//!
//! Examples:
//!   # Use a specific catalog file
//!   cargo run --features cli --bin feature_search -- \
//!     --catalog data/features/all_features.json "Mars valleys"
//!
//!   # Enable the AI resolver
//!   AI_SEARCH_ENABLE=true DEEPSEEK_API_KEY=sk-... \
//!     cargo run --features cli --bin feature_search -- "large mountains on the moon"
//!
//!   # Print the diagnostic snapshot
//!   cargo run --features cli --bin feature_search -- --status

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use stellar_search::{FeatureCatalog, ResolutionPipeline, SearchConfig};

/// Resolve planetary surface features from free text
#[derive(Parser, Debug)]
#[command(name = "feature_search")]
struct Args {
    /// Query, e.g. "show me large mountains on moon"
    query: Vec<String>,

    /// Feature catalog JSON file
    #[arg(long, env = "FEATURE_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    /// Print pipeline status instead of resolving a query
    #[arg(long)]
    status: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = SearchConfig::from_env()?;
    if let Some(path) = args.catalog {
        config.catalog_path = path;
    }

    let catalog = Arc::new(FeatureCatalog::load_or_empty(&config.catalog_path));
    let pipeline = ResolutionPipeline::new(catalog, config)
        .context("Failed to build resolution pipeline")?;

    let output = if args.status {
        to_json(&pipeline.status(), args.compact)?
    } else {
        let query = args.query.join(" ");
        if query.trim().is_empty() {
            bail!("A query is required unless --status is given");
        }
        to_json(&pipeline.resolve(&query).await, args.compact)?
    };

    println!("{}", output);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}
