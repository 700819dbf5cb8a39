//! # news_crawl
//!
//! A Google News crawler that collects Korean-language news for a set of
//! search queries, normalizes the feed entries, resolves a representative
//! image per article, and writes one ranked JSON artifact per run for the
//! backend to serve.
//!
//! ## Features
//!
//! - Fetches the Google News RSS search feed per query (Korean edition)
//! - Normalizes entries to KST timestamps, tag-free summaries, and tags
//! - Resolves images from feed metadata, article pages, or site favicons
//! - Splits capacity evenly across queries and backfills from productive ones
//! - Ranks by recency score and writes `news_extracted.json` per run
//!
//! ## Usage
//!
//! ```sh
//! news_crawl -q "부동산 정책" -q "금리" -m 20
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetching**: Download the RSS search feed for each query
//! 2. **Normalization**: Map feed entries to scored, tagged news items
//! 3. **Merging**: Dedup across queries and backfill remaining capacity
//! 4. **Output**: Rank and write the JSON artifact into a run directory

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod collect;
mod config;
mod feed;
mod images;
mod merge;
mod models;
mod normalize;
mod outputs;
mod rank;
mod utils;

use cli::Cli;
use collect::QueryCollector;
use config::CrawlConfig;
use feed::GoogleNewsFeed;
use images::ImageResolver;
use merge::merge_queries;
use normalize::EntryNormalizer;
use outputs::json;
use rank::rank;
use utils::{ensure_writable_dir, now_kst};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_crawl starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.query, ?args.max_items, "Parsed CLI arguments");

    let queries = args.queries();
    let total_limit = args.total_limit();
    let config = CrawlConfig::from_cli(&args);
    info!(
        queries = queries.len(),
        total_limit,
        fetch_og = config.fetch_og,
        favicon_fallback = config.favicon_fallback,
        "Crawl configured"
    );

    // Every run gets its own timestamped directory under the base path.
    let out_dir = format!(
        "{}/{}",
        config.base_out.trim_end_matches('/'),
        now_kst().format("%Y%m%d_%H%M%S")
    );

    // Early check: ensure the run directory is writable
    if let Err(e) = ensure_writable_dir(&out_dir).await {
        error!(
            path = %out_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Build the pipeline ----
    let client = match config.build_client() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build the HTTP client");
            return Err(e);
        }
    };
    let images = ImageResolver::new(client.clone(), &config);
    let normalizer = EntryNormalizer::new(images);
    let feed = GoogleNewsFeed::new(client);
    let collector = QueryCollector::new(feed, normalizer, config.sleep);

    // ---- Collect, merge, rank ----
    let mut items = merge_queries(&collector, &queries, total_limit).await;
    rank(&mut items, total_limit);

    // ---- Write the artifact ----
    match json::write_items(&items, &out_dir).await {
        Ok(path) => {
            info!(count = items.len(), path = %path, "Wrote ranked crawl results");
        }
        Err(e) => {
            error!(error = %e, "Failed to write crawl artifact");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
