//! Command-line front end for dish queries
//!
//! ```sh
//! # combined query against a JSON export of the collection
//! dish-query --fixture dishes.json --max-price 10 --category 1
//!
//! # single name search against MongoDB (feature `mongodb_backend`)
//! DISHES_MONGO_HOST=mongodatabase dish-query --config dishes.yaml --name-regex 'curry$'
//! ```

use anyhow::{Result, bail};
use clap::Parser;
use dishes::config::DishesConfig;
use dishes::core::{Criterion, CriteriaMatcher, DishCriteria, DishStore, MatchStrategy};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dish-query", about = "Query the dish collection")]
struct Cli {
    /// YAML configuration file with a `mongo:` section
    #[arg(long)]
    config: Option<String>,

    /// JSON array of dishes served from memory instead of MongoDB
    #[arg(long)]
    fixture: Option<String>,

    /// Price ceiling; 0 or below disables it
    #[arg(long, default_value_t = Decimal::ZERO, allow_negative_numbers = true)]
    max_price: Decimal,

    /// Popularity floor; 0 or below disables it
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_likes: i64,

    /// Case-insensitive substring of the dish name
    #[arg(long, default_value = "")]
    search: String,

    /// Category identifier (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Let the store evaluate the combined query natively
    #[arg(long)]
    pushdown: bool,

    /// Run a single regular-expression name search instead
    #[arg(long, conflicts_with_all = ["id"])]
    name_regex: Option<String>,

    /// Make --name-regex case sensitive
    #[arg(long, requires = "name_regex")]
    case_sensitive: bool,

    /// Look up a single dish by identifier instead
    #[arg(long)]
    id: Option<String>,
}

impl Cli {
    fn strategy(&self) -> MatchStrategy {
        if self.pushdown {
            MatchStrategy::Pushdown
        } else {
            MatchStrategy::InMemory
        }
    }

    /// Single regex criterion, when `--name-regex` was given
    fn name_criterion(&self) -> Option<Criterion> {
        self.name_regex.as_ref().map(|pattern| Criterion::NameMatch {
            pattern: pattern.clone(),
            case_insensitive: !self.case_sensitive,
        })
    }

    fn criteria(&self) -> DishCriteria {
        DishCriteria {
            max_price: self.max_price,
            min_likes: self.min_likes,
            search_by: self.search.clone(),
            category_ids: self.categories.clone(),
        }
    }
}

#[cfg(feature = "in-memory")]
fn open_fixture(path: &str) -> Result<Arc<dyn DishStore>> {
    let store = dishes::storage::InMemoryDishStore::from_json_file(path)?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "in-memory"))]
fn open_fixture(path: &str) -> Result<Arc<dyn DishStore>> {
    bail!("--fixture {} requires the `in-memory` feature", path)
}

#[cfg(feature = "mongodb_backend")]
async fn open_mongo(config: &DishesConfig) -> Result<Arc<dyn DishStore>> {
    let store = dishes::storage::MongoDishStore::connect(&config.mongo).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn open_mongo(_config: &DishesConfig) -> Result<Arc<dyn DishStore>> {
    bail!("no --fixture given and the `mongodb_backend` feature is disabled")
}

async fn open_store(cli: &Cli) -> Result<Arc<dyn DishStore>> {
    match &cli.fixture {
        Some(path) => open_fixture(path),
        None => {
            let config = DishesConfig::resolve(cli.config.as_deref())?;
            open_mongo(&config).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = open_store(&cli).await?;
    let matcher = CriteriaMatcher::new(store).with_strategy(cli.strategy());

    let output = if let Some(id) = &cli.id {
        match matcher.fetch_by_id(id).await? {
            Some(dish) => serde_json::to_string_pretty(&dish)?,
            None => bail!("dish '{}' not found", id),
        }
    } else if let Some(criterion) = cli.name_criterion() {
        serde_json::to_string_pretty(&matcher.fetch(&criterion).await?)?
    } else {
        serde_json::to_string_pretty(&matcher.match_all(&cli.criteria()).await?)?
    };

    println!("{}", output);
    Ok(())
}
