//! Final ordering of merged results.
//!
//! Score descending, then published time descending, then title ascending
//! so equally fresh items land in a stable order. The merged set is capped
//! to the total limit after sorting.

use chrono::DateTime;
use tracing::instrument;

use crate::models::NewsItem;

/// Sort items into presentation order and cap at `total_limit`.
#[instrument(level = "info", skip_all, fields(count = items.len(), total_limit))]
pub fn rank(items: &mut Vec<NewsItem>, total_limit: usize) {
    items.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| published_ts(b).cmp(&published_ts(a)))
            .then_with(|| a.title.cmp(&b.title))
    });
    items.truncate(total_limit);
}

/// Millisecond timestamp for ordering; unparseable dates sort oldest.
fn published_ts(item: &NewsItem) -> i64 {
    DateTime::parse_from_rfc3339(&item.published_at)
        .map(|date| date.timestamp_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, score: f64, published_at: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            url: format!("https://news.example.com/{}", title),
            source: "GoogleNews".to_string(),
            published_at: published_at.to_string(),
            summary: String::new(),
            score,
            tags: Vec::new(),
            query: String::new(),
            image_url: None,
        }
    }

    fn titles(items: &[NewsItem]) -> Vec<&str> {
        items.iter().map(|item| item.title.as_str()).collect()
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let mut items = vec![
            item("c", 0.2, "2025-08-20T10:00:00+09:00"),
            item("a", 0.9, "2025-08-20T10:00:00+09:00"),
            item("b", 0.5, "2025-08-20T10:00:00+09:00"),
        ];
        rank(&mut items, 10);
        assert_eq!(titles(&items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rank_breaks_score_ties_by_recency() {
        let mut items = vec![
            item("older", 0.8, "2025-08-19T10:00:00+09:00"),
            item("newer", 0.8, "2025-08-20T10:00:00+09:00"),
        ];
        rank(&mut items, 10);
        assert_eq!(titles(&items), vec!["newer", "older"]);
    }

    #[test]
    fn test_rank_breaks_full_ties_by_title() {
        let mut items = vec![
            item("나 기사", 0.8, "2025-08-20T10:00:00+09:00"),
            item("가 기사", 0.8, "2025-08-20T10:00:00+09:00"),
        ];
        rank(&mut items, 10);
        assert_eq!(titles(&items), vec!["가 기사", "나 기사"]);
    }

    #[test]
    fn test_rank_sorts_unparseable_dates_last_within_score() {
        let mut items = vec![
            item("broken", 0.8, "언젠가"),
            item("dated", 0.8, "2025-08-20T10:00:00+09:00"),
        ];
        rank(&mut items, 10);
        assert_eq!(titles(&items), vec!["dated", "broken"]);
    }

    #[test]
    fn test_rank_truncates_after_sorting() {
        let mut items = vec![
            item("d", 0.1, "2025-08-20T10:00:00+09:00"),
            item("a", 0.9, "2025-08-20T10:00:00+09:00"),
            item("c", 0.3, "2025-08-20T10:00:00+09:00"),
            item("b", 0.7, "2025-08-20T10:00:00+09:00"),
        ];
        rank(&mut items, 2);
        assert_eq!(titles(&items), vec!["a", "b"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let mut items = vec![
            item("b", 0.5, "2025-08-20T10:00:00+09:00"),
            item("a", 0.9, "2025-08-19T10:00:00+09:00"),
            item("c", 0.5, "2025-08-18T10:00:00+09:00"),
        ];
        rank(&mut items, 10);
        let first = titles(&items)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        rank(&mut items, 10);
        assert_eq!(titles(&items), first);
    }
}
