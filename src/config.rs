//! Runtime configuration resolved once from the CLI.
//!
//! The pipeline components never read the environment themselves; every
//! tuning knob is captured into a [`CrawlConfig`] at startup and threaded
//! into constructors. This also owns the shared HTTP client so all fetches
//! (feed and page probes alike) present the same browser identity.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

use crate::cli::Cli;

/// Browser identity sent with every request. Google News serves a reduced
/// feed to unknown agents, so this mirrors a mainstream desktop Chrome.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";

/// Locale preference matching the feed's `hl=ko&gl=KR` parameters.
pub const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

const PAGE_TIMEOUT_SECS: u64 = 8;

/// Resolved crawl settings shared across the pipeline.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Timeout for feed requests.
    pub feed_timeout: Duration,
    /// Timeout for the optional article-page probe.
    pub page_timeout: Duration,
    /// Whether the page-probe image tier is enabled.
    pub fetch_og: bool,
    /// Whether the favicon fallback image tier is enabled.
    pub favicon_fallback: bool,
    /// Pause observed between entries while collecting a query.
    pub sleep: Duration,
    /// Base directory that timestamped run directories are created under.
    pub base_out: String,
}

impl CrawlConfig {
    /// Capture the parsed CLI into an explicit config object.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            feed_timeout: Duration::from_secs(cli.timeout),
            page_timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
            fetch_og: cli.fetch_og,
            favicon_fallback: cli.favicon_fallback,
            sleep: Duration::from_millis(cli.sleep_ms),
            base_out: cli.out_dir.clone(),
        }
    }

    /// Build the shared HTTP client: feed timeout as the default, crawl
    /// user-agent, and Korean-first `Accept-Language`. Page probes override
    /// the timeout per request.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the client cannot be constructed
    /// (a broken TLS backend, in practice).
    pub fn build_client(&self) -> Result<Client, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        Ok(Client::builder()
            .timeout(self.feed_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?)
    }
}
