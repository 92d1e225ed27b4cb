use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::{Document, FilterValue, SearchEngine, SearchOptions, SortDirection, SortSpec};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "product-search")]
#[command(about = "Query an in-memory product catalog index", long_about = None)]
struct Cli {
    /// Path to the JSON catalog (an array of product records)
    #[arg(long, default_value = "data/products.json")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and print the response as JSON
    Search {
        query: String,
        /// 1-indexed page of results
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        /// Filters as JSON, e.g. '{"category":"cakes","price":{"min":20,"max":80}}'
        #[arg(long)]
        filters: Option<String>,
        /// Secondary sort field (breaks relevance near-ties)
        #[arg(long)]
        sort: Option<String>,
        /// Sort the secondary field descending
        #[arg(long, default_value_t = false)]
        desc: bool,
    },
    /// Print index statistics
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let engine = load_engine(&cli.catalog)?;

    match cli.command {
        Commands::Search {
            query,
            page,
            page_size,
            filters,
            sort,
            desc,
        } => {
            let filters = match filters {
                Some(raw) => serde_json::from_str::<BTreeMap<String, FilterValue>>(&raw)
                    .context("invalid --filters JSON")?,
                None => BTreeMap::new(),
            };
            let sort = sort.map(|field| SortSpec {
                field,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            });
            let options = SearchOptions {
                filters,
                sort,
                page: Some(page),
                page_size,
            };
            let response = engine.search(&query, &options);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&engine.statistics())?);
        }
    }
    Ok(())
}

fn load_engine(catalog: &Path) -> Result<SearchEngine> {
    let file = File::open(catalog)
        .with_context(|| format!("opening catalog {}", catalog.display()))?;
    let docs: Vec<Document> =
        serde_json::from_reader(BufReader::new(file)).context("parsing catalog JSON")?;

    let mut engine = SearchEngine::default();
    let count = docs.len();
    engine.index_documents(docs);
    tracing::info!(count, "catalog indexed");
    Ok(engine)
}
