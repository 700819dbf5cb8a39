//! Data models for crawled news records.
//!
//! The crate revolves around a single output unit:
//! - [`NewsItem`]: one normalized feed entry, scored and tagged, ready for
//!   the ranked JSON artifact
//!
//! Records serialize with camelCase field names to match the JSON contract
//! consumed by the dashboard backend, hence the `#[serde(rename_all)]`
//! attribute; the Rust-side fields stay snake_case.

use serde::{Deserialize, Serialize};

/// A normalized news record produced from one feed entry.
///
/// Instances are created by the entry normalizer, deduplicated by the merge
/// pass on their `(title, url)` pair, ordered by the ranking stage, and
/// finally serialized into the crawl artifact. They are never mutated after
/// creation.
///
/// # JSON Schema
///
/// Serialized field names are camelCase (`publishedAt`, `imageUrl`) to match
/// what the downstream dashboard reads. A record with no resolvable image
/// serializes `imageUrl` as `null`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// The entry headline; empty when the feed omitted it.
    pub title: String,
    /// Canonical article link; paired with `title` as the dedup key.
    pub url: String,
    /// Publisher name as reported by the feed, `"GoogleNews"` when absent.
    pub source: String,
    /// Publication time as an RFC 3339 string in the KST (+09:00) offset.
    pub published_at: String,
    /// Entry summary with all markup tags stripped.
    pub summary: String,
    /// Recency score in `[0, 1]` rounded to 3 decimals; 1.0 is brand new,
    /// 0.0 is seven days old or older.
    pub score: f64,
    /// Feed category terms followed by the originating query.
    pub tags: Vec<String>,
    /// The search query that produced this record.
    pub query: String,
    /// Best-effort representative image, `None` when every tier missed.
    pub image_url: Option<String>,
}
