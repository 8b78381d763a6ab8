//! Showgraph command-line entry point.
//!
//! Loads configuration, crawls the configured seed shows and prints a
//! summary of the stored graph. Individual seed failures are logged and do
//! not change the exit status.

mod summary;

use anyhow::Context;
use clap::Parser;
use showgraph_core::AppConfig;
use showgraph_crawler::{CatalogUrls, CrawlController};
use showgraph_db::Database;
use showgraph_fetch::{HeaderProfile, HttpFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::summary::Summary;

#[derive(Parser, Debug)]
#[command(name = "showgraph", version, about = "Crawl TV shows and their credited writers")]
struct Args {
    /// Seed titles; replaces the configured seed list when given
    seeds: Vec<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Run-wide depth ceiling (0 = seed shows only)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Disable politeness and inter-seed delays
    #[arg(long)]
    no_delay: bool,

    /// Crawl discovered other shows instead of only recording them
    #[arg(long)]
    follow_leads: bool,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,showgraph=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    }
    .with_env_overrides();

    if !args.seeds.is_empty() {
        config.crawl.seed_titles.clone_from(&args.seeds);
    }
    if let Some(path) = &args.db {
        config.database.path = Some(path.clone());
    }
    if let Some(depth) = args.max_depth {
        config.crawl.max_depth = depth;
    }
    if args.follow_leads {
        config.crawl.follow_leads = true;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    info!("Starting Showgraph v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args).context("failed to load configuration")?;
    let db_path = config.database_path()?;
    info!("Using database at {}", db_path.display());

    let db = Arc::new(
        Database::open_and_migrate(&db_path)
            .await
            .context("failed to open database")?,
    );
    let fetcher = HttpFetcher::with_headers(&HeaderProfile::from_config(&config.transport))?;
    let urls = CatalogUrls::new(&config.transport.base_url)?;

    let mut crawl = config.crawl_config();
    if args.no_delay {
        crawl = crawl.without_delays();
    }
    info!(
        seeds = crawl.seed_titles.len(),
        max_depth = crawl.max_depth,
        follow_leads = crawl.follow_leads,
        "Crawling seed shows"
    );

    let controller = CrawlController::new(crawl, urls, Arc::new(fetcher), Arc::clone(&db));
    let report = controller.run().await;

    let summary = Summary::collect(&db, &report).await?;
    print!("{summary}");

    Ok(())
}
