//! Image extraction for feed entries.
//!
//! Every entry gets at most one image URL, picked by working through the
//! tiers in order, cheapest first:
//!
//! | Tier | Source                                    | Network |
//! |------|-------------------------------------------|---------|
//! | 1    | `<media:content url="...">`               | no      |
//! | 2    | `<media:thumbnail url="...">`             | no      |
//! | 3    | enclosure with an image MIME type         | no      |
//! | 4    | `<img src="...">` inside the summary HTML | no      |
//! | 5    | article page og/twitter/JSON-LD metadata  | yes     |
//! | 6    | Google favicon service for the host       | no      |
//!
//! Tier 5 runs only when page probing is switched on and the crate is built
//! with the `page-meta` feature; tier 6 only when the favicon fallback is
//! enabled. Any failure falls through to the next tier.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use rss::Item;
use url::Url;

#[cfg(feature = "page-meta")]
use scraper::{Html, Selector};
#[cfg(feature = "page-meta")]
use serde_json::Value;
#[cfg(feature = "page-meta")]
use std::time::Duration;
#[cfg(feature = "page-meta")]
use tracing::{instrument, warn};

use crate::config::CrawlConfig;

static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=["'](.*?)["']"#).unwrap());

/// Resolves one image URL per feed entry.
pub struct ImageResolver {
    #[cfg(feature = "page-meta")]
    client: Client,
    fetch_page: bool,
    favicon_fallback: bool,
    #[cfg(feature = "page-meta")]
    page_timeout: Duration,
}

impl ImageResolver {
    /// Build a resolver from the shared client and crawl settings.
    ///
    /// Page probing needs both the runtime switch and the `page-meta`
    /// feature; without the feature the probe tier is skipped entirely.
    #[cfg(feature = "page-meta")]
    pub fn new(client: Client, config: &CrawlConfig) -> Self {
        Self {
            client,
            fetch_page: config.fetch_og,
            favicon_fallback: config.favicon_fallback,
            page_timeout: config.page_timeout,
        }
    }

    #[cfg(not(feature = "page-meta"))]
    pub fn new(_client: Client, config: &CrawlConfig) -> Self {
        Self {
            fetch_page: false,
            favicon_fallback: config.favicon_fallback,
        }
    }

    /// Pick the best image URL for an entry, or `None` when every enabled
    /// tier comes up empty.
    pub async fn resolve(&self, item: &Item, link: &str) -> Option<String> {
        if let Some(url) = entry_image(item) {
            return Some(url);
        }
        if self.fetch_page {
            if let Some(url) = self.fetch_page_image(link).await {
                return Some(url);
            }
        }
        if self.favicon_fallback {
            return favicon_url(link);
        }
        None
    }

    /// Fetch the article page and pull an image out of its metadata.
    #[cfg(feature = "page-meta")]
    #[instrument(level = "info", skip_all, fields(url = %url))]
    async fn fetch_page_image(&self, url: &str) -> Option<String> {
        let response = match self
            .client
            .get(url)
            .timeout(self.page_timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Skipping page image probe");
                return None;
            }
        };

        // Relative hrefs resolve against the final URL after redirects.
        let base = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "Failed to read article page");
                return None;
            }
        };

        page_image(&body, &base)
    }

    #[cfg(not(feature = "page-meta"))]
    async fn fetch_page_image(&self, _url: &str) -> Option<String> {
        None
    }
}

/// Feed-level tiers: media extensions, enclosure, then summary markup.
fn entry_image(item: &Item) -> Option<String> {
    media_url(item, "content")
        .or_else(|| media_url(item, "thumbnail"))
        .or_else(|| enclosure_image(item))
        .or_else(|| summary_image(item.description().unwrap_or_default()))
}

/// First non-empty `url` attribute among the `media:` extensions of the
/// given element name.
fn media_url(item: &Item, element: &str) -> Option<String> {
    item.extensions()
        .get("media")?
        .get(element)?
        .iter()
        .find_map(|ext| ext.attrs().get("url").filter(|url| !url.is_empty()))
        .cloned()
}

fn enclosure_image(item: &Item) -> Option<String> {
    item.enclosure()
        .filter(|enclosure| {
            enclosure.mime_type().contains("image") && !enclosure.url().is_empty()
        })
        .map(|enclosure| enclosure.url().to_string())
}

/// `src` of the first `<img>` tag in the summary HTML, if any.
fn summary_image(summary: &str) -> Option<String> {
    IMG_SRC_RE
        .captures(summary)
        .map(|caps| caps[1].to_string())
        .filter(|src| !src.is_empty())
}

/// Last-resort image: Google's favicon service for the link's host,
/// explicit port included.
fn favicon_url(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let host = url.host_str()?;
    let domain = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Some(format!(
        "https://www.google.com/s2/favicons?sz=128&domain={}",
        domain
    ))
}

/// Metadata scan of a fetched page: Open Graph, Twitter card, then JSON-LD.
///
/// Each family is anchored on the first matching element: an `og:image` tag
/// with an empty `content` disqualifies the whole Open Graph tier rather
/// than moving on to `og:image:secure_url`.
#[cfg(feature = "page-meta")]
fn page_image(body: &str, base: &Url) -> Option<String> {
    let doc = Html::parse_document(body);
    let find = |css: &str| {
        Selector::parse(css)
            .ok()
            .and_then(|selector| doc.select(&selector).next())
    };

    let og = find(r#"meta[property="og:image"]"#)
        .or_else(|| find(r#"meta[property="og:image:secure_url"]"#))
        .or_else(|| find(r#"meta[name="og:image"]"#));
    if let Some(meta) = og {
        if let Some(content) = meta.value().attr("content") {
            if !content.is_empty() {
                return Some(resolve_href(base, content.trim()));
            }
        }
    }

    let twitter = find(r#"meta[name="twitter:image"]"#)
        .or_else(|| find(r#"meta[property="twitter:image"]"#));
    if let Some(meta) = twitter {
        if let Some(content) = meta.value().attr("content") {
            if !content.is_empty() {
                return Some(resolve_href(base, content.trim()));
            }
        }
    }

    json_ld_image(&doc, base)
}

#[cfg(feature = "page-meta")]
fn json_ld_image(doc: &Html, base: &Url) -> Option<String> {
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;
    for script in doc.select(&selector) {
        let raw = script.text().collect::<String>();
        let data: Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(_) => continue,
        };
        if let Some(image) = linked_data_image(&data, base) {
            return Some(image);
        }
    }
    None
}

/// Walk a JSON-LD value looking for `image` or `thumbnailUrl`.
///
/// `image` may be a plain string, an object carrying `url`, or an array of
/// either. Arrays and `@graph` nodes are searched recursively, and every hit
/// is resolved against the page URL.
#[cfg(feature = "page-meta")]
fn linked_data_image(data: &Value, base: &Url) -> Option<String> {
    match data {
        Value::Array(entries) => entries
            .iter()
            .find_map(|entry| linked_data_image(entry, base)),
        Value::Object(map) => {
            match map.get("image") {
                Some(Value::String(image)) => return Some(resolve_href(base, image)),
                Some(Value::Object(image)) => {
                    if let Some(url) = image.get("url").and_then(Value::as_str) {
                        if !url.is_empty() {
                            return Some(resolve_href(base, url));
                        }
                    }
                }
                Some(Value::Array(entries)) => {
                    for entry in entries {
                        match entry {
                            Value::String(image) => {
                                return Some(resolve_href(base, image));
                            }
                            Value::Object(image) => {
                                if let Some(url) = image.get("url").and_then(Value::as_str) {
                                    if !url.is_empty() {
                                        return Some(resolve_href(base, url));
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
            if let Some(thumb) = map.get("thumbnailUrl").and_then(Value::as_str) {
                return Some(resolve_href(base, thumb));
            }
            map.get("@graph")
                .and_then(|graph| linked_data_image(graph, base))
        }
        _ => None,
    }
}

#[cfg(feature = "page-meta")]
fn resolve_href(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}
