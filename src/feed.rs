//! Google News RSS retrieval.
//!
//! One request per query against the `rss/search` endpoint, pinned to the
//! Korean edition (`hl=ko&gl=KR&ceid=KR:ko`). Transport errors, non-success
//! statuses, and unparseable bodies all degrade to an empty [`Channel`] so a
//! single bad feed never aborts a multi-query crawl.

use reqwest::Client;
use rss::Channel;
use tracing::{info, instrument, warn};

use crate::utils::truncate_for_log;

const GOOGLE_NEWS_BASE: &str = "https://news.google.com";

/// Source of parsed feeds, keyed by search query.
///
/// The crawl pipeline only ever sees this trait, which keeps collection
/// logic testable against canned channels.
pub trait FetchFeed {
    /// Fetch and parse the feed for one query.
    ///
    /// Never fails: every error path logs a warning and returns an empty
    /// channel instead.
    async fn fetch(&self, query: &str) -> Channel;
}

/// Live feed client for the Google News search endpoint.
pub struct GoogleNewsFeed {
    client: Client,
    base_url: String,
}

impl GoogleNewsFeed {
    /// Create a feed client against the real Google News host.
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, GOOGLE_NEWS_BASE.to_string())
    }

    /// Create a feed client against an alternate host.
    pub fn with_base_url(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl FetchFeed for GoogleNewsFeed {
    #[instrument(level = "info", skip_all, fields(query = %query))]
    async fn fetch(&self, query: &str) -> Channel {
        let url = format!(
            "{}/rss/search?q={}&hl=ko&gl=KR&ceid=KR:ko",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%url, error = %err, "Feed request failed");
                return Channel::default();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Feed request returned non-success status");
            return Channel::default();
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%url, error = %err, "Failed to read feed body");
                return Channel::default();
            }
        };

        match Channel::read_from(&bytes[..]) {
            Ok(channel) => {
                info!(%url, %status, entries = channel.items().len(), "Fetched feed");
                channel
            }
            Err(err) => {
                warn!(
                    %url,
                    error = %err,
                    body = %truncate_for_log(&String::from_utf8_lossy(&bytes), 200),
                    "Feed body is not valid RSS"
                );
                Channel::default()
            }
        }
    }
}
