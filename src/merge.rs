//! Multi-query merge.
//!
//! Total capacity is split evenly across queries for the first pass. A
//! second pass re-fetches the queries in order, each time asking for only
//! the remaining capacity, so a productive query can backfill what a thin
//! one left unfilled. Duplicates are dropped on `(title, url)` across both
//! passes.

use std::collections::HashSet;
use tracing::{info, instrument};

use crate::collect::CollectQuery;
use crate::models::NewsItem;

/// Collect up to `total_limit` unique items across all queries.
#[instrument(level = "info", skip_all, fields(queries = queries.len(), total_limit))]
pub async fn merge_queries<C: CollectQuery>(
    collector: &C,
    queries: &[String],
    total_limit: usize,
) -> Vec<NewsItem> {
    let mut merged: Vec<NewsItem> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    if queries.is_empty() {
        return merged;
    }

    let per_query = (total_limit / queries.len()).max(1);

    'first: for query in queries {
        let chunk = collector.collect(query, per_query).await;
        info!(query = %query, fetched = chunk.len(), "First-pass intake");
        for item in chunk {
            if !seen.insert((item.title.clone(), item.url.clone())) {
                continue;
            }
            merged.push(item);
            if merged.len() >= total_limit {
                break 'first;
            }
        }
    }

    if merged.len() < total_limit {
        for query in queries {
            let need = total_limit - merged.len();
            if need == 0 {
                break;
            }
            info!(query = %query, need, "Backfilling remaining capacity");
            let chunk = collector.collect(query, need).await;
            for item in chunk {
                if !seen.insert((item.title.clone(), item.url.clone())) {
                    continue;
                }
                merged.push(item);
                if merged.len() >= total_limit {
                    break;
                }
            }
        }
    }

    info!(count = merged.len(), "Merged query results");
    merged
}
