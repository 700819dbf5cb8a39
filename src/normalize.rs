//! Feed entry normalization.
//!
//! Turns raw RSS items into [`NewsItem`] records: KST timestamps, tag-free
//! summaries, a recency score over a one-week window, and a resolved image
//! URL. Entries with missing fields never fail normalization; absent values
//! degrade to empty strings or the capture time.

use chrono::{DateTime, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use rss::Item;

use crate::images::ImageResolver;
use crate::models::NewsItem;

/// Source label used when a feed entry carries no `<source>` element.
pub const DEFAULT_SOURCE: &str = "GoogleNews";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Converts feed entries into normalized news records.
pub struct EntryNormalizer {
    images: ImageResolver,
}

impl EntryNormalizer {
    pub fn new(images: ImageResolver) -> Self {
        Self { images }
    }

    /// Normalize one feed entry.
    ///
    /// `now` is the capture time for the whole query pass; it doubles as the
    /// published time for entries without a parseable `pubDate` and anchors
    /// the recency score.
    pub async fn normalize(
        &self,
        item: &Item,
        query: &str,
        now: DateTime<FixedOffset>,
    ) -> NewsItem {
        let title = item.title().unwrap_or_default().to_string();
        let link = item.link().unwrap_or_default().to_string();
        let source = item
            .source()
            .and_then(|source| source.title())
            .unwrap_or(DEFAULT_SOURCE)
            .to_string();

        let published = item
            .pub_date()
            .and_then(parse_pub_date)
            .map(|date| date.with_timezone(now.offset()))
            .unwrap_or(now);

        let summary = strip_tags(item.description().unwrap_or_default());

        let mut tags: Vec<String> = item
            .categories()
            .iter()
            .map(|category| category.name().to_string())
            .collect();
        tags.push(query.to_string());

        let image_url = self.images.resolve(item, &link).await;

        NewsItem {
            title,
            url: link,
            source,
            published_at: published.to_rfc3339(),
            summary,
            score: recency_score(published, now),
            tags,
            query: query.to_string(),
            image_url,
        }
    }
}

fn parse_pub_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

fn strip_tags(raw: &str) -> String {
    TAG_RE.replace_all(raw, "").trim().to_string()
}

/// Freshness on a one-week window: 1.0 for brand-new entries, falling
/// linearly to 0.0 at seven days, rounded to three decimals. Future dates
/// clamp to 1.0.
fn recency_score(published: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> f64 {
    let age_days = ((now - published).num_milliseconds() as f64 / 1000.0 / 86_400.0).max(0.0);
    ((1.0 - age_days / 7.0).max(0.0) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;
    use reqwest::Client;
    use rss::Category;
    use std::time::Duration;

    fn normalizer() -> EntryNormalizer {
        let config = CrawlConfig {
            feed_timeout: Duration::from_secs(2),
            page_timeout: Duration::from_secs(2),
            fetch_og: false,
            favicon_fallback: false,
            sleep: Duration::ZERO,
            base_out: String::new(),
        };
        EntryNormalizer::new(ImageResolver::new(Client::new(), &config))
    }

    fn fixed_now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2025-08-20T12:00:00+09:00").unwrap()
    }

    #[tokio::test]
    async fn test_empty_entry_gets_defaults() {
        let now = fixed_now();
        let record = normalizer().normalize(&Item::default(), "부동산 정책", now).await;

        assert_eq!(record.title, "");
        assert_eq!(record.url, "");
        assert_eq!(record.source, DEFAULT_SOURCE);
        assert_eq!(record.published_at, now.to_rfc3339());
        assert_eq!(record.summary, "");
        assert_eq!(record.score, 1.0);
        assert_eq!(record.tags, vec!["부동산 정책".to_string()]);
        assert_eq!(record.query, "부동산 정책");
        assert_eq!(record.image_url, None);
    }

    #[tokio::test]
    async fn test_pub_date_converts_to_kst() {
        let mut item = Item::default();
        item.set_pub_date("Wed, 20 Aug 2025 01:00:00 GMT".to_string());

        let record = normalizer().normalize(&item, "금리", fixed_now()).await;
        assert_eq!(record.published_at, "2025-08-20T10:00:00+09:00");
    }

    #[tokio::test]
    async fn test_summary_tags_are_stripped_and_image_extracted() {
        let mut item = Item::default();
        item.set_description(
            r#"<b>부동산</b> 정책 <img src="https://img.example.com/i.jpg"> 발표"#.to_string(),
        );

        let record = normalizer().normalize(&item, "부동산 정책", fixed_now()).await;
        assert_eq!(record.summary, "부동산 정책  발표");
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://img.example.com/i.jpg")
        );
    }

    #[tokio::test]
    async fn test_score_is_half_at_three_and_a_half_days() {
        let mut item = Item::default();
        // 2025-08-17T00:00:00+09:00, exactly 3.5 days before the fixed now.
        item.set_pub_date("Sat, 16 Aug 2025 15:00:00 GMT".to_string());

        let record = normalizer().normalize(&item, "금리", fixed_now()).await;
        assert_eq!(record.score, 0.5);
    }

    #[tokio::test]
    async fn test_score_clamps_at_both_ends() {
        let now = fixed_now();

        let mut stale = Item::default();
        stale.set_pub_date("Fri, 01 Aug 2025 00:00:00 GMT".to_string());
        let record = normalizer().normalize(&stale, "금리", now).await;
        assert_eq!(record.score, 0.0);

        let mut future = Item::default();
        future.set_pub_date("Thu, 21 Aug 2025 12:00:00 GMT".to_string());
        let record = normalizer().normalize(&future, "금리", now).await;
        assert_eq!(record.score, 1.0);
    }

    #[tokio::test]
    async fn test_category_tags_precede_the_query_tag() {
        let mut category = Category::default();
        category.set_name("경제");
        let mut item = Item::default();
        item.set_categories(vec![category]);

        let record = normalizer().normalize(&item, "부동산 정책", fixed_now()).await;
        assert_eq!(
            record.tags,
            vec!["경제".to_string(), "부동산 정책".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unparseable_pub_date_falls_back_to_now() {
        let now = fixed_now();
        let mut item = Item::default();
        item.set_pub_date("어제".to_string());

        let record = normalizer().normalize(&item, "금리", now).await;
        assert_eq!(record.published_at, now.to_rfc3339());
        assert_eq!(record.score, 1.0);
    }
}
