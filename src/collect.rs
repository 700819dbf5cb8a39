//! Per-query collection.
//!
//! One feed fetch per query, then sequential normalization of the entries
//! up to the per-query limit. A short pause between entries keeps article
//! hosts from being hammered when page probing is switched on.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::feed::FetchFeed;
use crate::models::NewsItem;
use crate::normalize::EntryNormalizer;
use crate::utils::now_kst;

/// Produces normalized items for one query, newest-first as the feed
/// returns them.
pub trait CollectQuery {
    async fn collect(&self, query: &str, limit: usize) -> Vec<NewsItem>;
}

/// Feed-backed collector used by the live pipeline.
pub struct QueryCollector<F> {
    feed: F,
    normalizer: EntryNormalizer,
    delay: Duration,
}

impl<F> QueryCollector<F> {
    pub fn new(feed: F, normalizer: EntryNormalizer, delay: Duration) -> Self {
        Self {
            feed,
            normalizer,
            delay,
        }
    }
}

impl<F: FetchFeed> CollectQuery for QueryCollector<F> {
    #[instrument(level = "info", skip_all, fields(query = %query, limit))]
    async fn collect(&self, query: &str, limit: usize) -> Vec<NewsItem> {
        let channel = self.feed.fetch(query).await;
        // One capture time per pass; every entry in it ages against this.
        let now = now_kst();

        let mut items = Vec::new();
        for entry in channel.items().iter().take(limit) {
            items.push(self.normalizer.normalize(entry, query, now).await);

            if items.len() >= limit {
                break;
            }
            sleep(self.delay).await;
        }

        info!(count = items.len(), "Collected entries");
        items
    }
}
