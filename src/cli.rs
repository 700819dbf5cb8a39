//! Command-line interface definitions for the news crawler.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can be provided via command-line flags, and the tuning knobs
//! also read `CRAWL_*` environment variables.

use clap::{ArgAction, Parser};

/// Query used when no `--query` flag is given.
pub const DEFAULT_QUERY: &str = "부동산 정책";

/// Command-line arguments for the news crawler.
///
/// This struct defines all configuration options that can be passed to the
/// crawler at runtime: the query plan, the total item budget, network
/// timeouts, the optional image-probe tiers, and the output location.
///
/// # Examples
///
/// ```sh
/// # Crawl the default query, 20 items
/// news_crawl
///
/// # Two queries sharing a 30-item budget
/// news_crawl -q "청년 지원금" -q "부동산 정책" -m 30
///
/// # Enable the page-probe image tier and slow the per-entry pacing
/// news_crawl --fetch-og --sleep-ms 200
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search query; repeat the flag to crawl several queries in one run
    #[arg(short, long)]
    pub query: Vec<String>,

    /// Total number of items to collect across all queries
    #[arg(short, long, default_value_t = 20)]
    pub max_items: usize,

    /// Feed request timeout in seconds
    #[arg(long, env = "CRAWL_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Probe linked pages for og:/twitter:/JSON-LD images when the feed carries none
    #[arg(
        long,
        env = "CRAWL_FETCH_OG",
        action = ArgAction::Set,
        value_parser = parse_switch,
        num_args = 0..=1,
        default_value = "0",
        default_missing_value = "1"
    )]
    pub fetch_og: bool,

    /// Fall back to the site favicon when no article image is found
    #[arg(
        long,
        env = "CRAWL_FAVICON_FALLBACK",
        action = ArgAction::Set,
        value_parser = parse_switch,
        num_args = 0..=1,
        default_value = "1",
        default_missing_value = "1"
    )]
    pub favicon_fallback: bool,

    /// Pause between entries in milliseconds
    #[arg(long, env = "CRAWL_SLEEP_MS", default_value_t = 50)]
    pub sleep_ms: u64,

    /// Base directory for timestamped crawl outputs
    #[arg(long, env = "CRAWL_BASE_OUT", default_value = "data/crawl/outputs")]
    pub out_dir: String,
}

impl Cli {
    /// The query plan for this run, falling back to [`DEFAULT_QUERY`] when
    /// no query was given.
    pub fn queries(&self) -> Vec<String> {
        if self.query.is_empty() {
            vec![DEFAULT_QUERY.to_string()]
        } else {
            self.query.clone()
        }
    }

    /// Total item budget, clamped to at least 1.
    pub fn total_limit(&self) -> usize {
        self.max_items.max(1)
    }
}

/// Parse a switch-style value. `1`, `true`, and `yes` (any case) enable the
/// switch; anything else disables it rather than failing, so a stray
/// `CRAWL_FETCH_OG=on` quietly means off instead of aborting the run.
fn parse_switch(raw: &str) -> Result<bool, String> {
    Ok(matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    ))
}
