//! Field-by-field normalization of captured feed items into [`Article`]s.
//!
//! Every field resolves through an ordered fallback chain: first present,
//! non-empty source wins, and the chain bottoms out in a fixed default.
//! A sparsely populated item therefore never blocks the batch — it just
//! renders with placeholders.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::article::Article;
use crate::util::{strip_html, truncate_chars};

use super::item::{FeedElement, ItemNode};

/// Byline used when an item carries neither `<author>` nor `<dc:creator>`.
pub const DEFAULT_AUTHOR: &str = "codecentric Team";
/// Headline used when an item has no `<title>`.
pub const DEFAULT_TITLE: &str = "Untitled";
/// Link used when an item has no `<link>`.
pub const DEFAULT_URL: &str = "#";
/// Hard cap on excerpt length, in characters.
pub const EXCERPT_MAX_CHARS: usize = 200;

/// First `<img src="...">` occurrence in an HTML fragment. Deliberately
/// permissive and double-quote only: `src` must appear literally with a
/// double-quoted value, but attribute order within the tag is irrelevant.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("img regex is valid")
});

/// Normalizes one captured item into an [`Article`].
///
/// Pure apart from two sanctioned nondeterminisms: the current-time
/// fallback when `<pubDate>` is missing or unparsable, and nothing else —
/// the placeholder image is deterministic per `index`.
pub fn normalize(item: &ItemNode, index: usize) -> Article {
    Article {
        id: item
            .first_text("guid")
            .map(str::to_owned)
            .unwrap_or_else(|| format!("article-{index}")),
        title: item
            .first_text("title")
            .unwrap_or(DEFAULT_TITLE)
            .to_owned(),
        author: item
            .first_text("author")
            .or_else(|| item.first_text("creator"))
            .unwrap_or(DEFAULT_AUTHOR)
            .to_owned(),
        publish_date: parse_publish_date(item.first_text("pubDate")),
        excerpt: item
            .first_text("description")
            .map(|html| truncate_chars(&strip_html(html), EXCERPT_MAX_CHARS).into_owned())
            .unwrap_or_default(),
        url: item.first_text("link").unwrap_or(DEFAULT_URL).to_owned(),
        featured_image: discover_image(item).unwrap_or_else(|| placeholder_image(index)),
        categories: item
            .elements("category")
            .map(|category| category.text().to_owned())
            .collect(),
    }
}

/// Deterministic per-index placeholder for items with no discoverable image.
pub fn placeholder_image(index: usize) -> String {
    format!("https://picsum.photos/seed/{index}/400/250")
}

/// Resolves an item's image through the discovery chain, stopping at the
/// first matching ELEMENT:
///
/// 1. `media:thumbnail` (any prefix) — `url` attribute
/// 2. `media:content` (any prefix) — `url` attribute
/// 3. `<enclosure>` with an `image/*` type — `url` attribute
/// 4. first `<img src="...">` in `content:encoded`, else `<description>`
///
/// A thumbnail/content/enclosure element that is present but lacks a
/// usable `url` ends the chain with `None`; it does not fall through to
/// the later steps.
pub fn discover_image(item: &ItemNode) -> Option<String> {
    if let Some(thumbnail) = item.first("thumbnail") {
        return element_url(thumbnail);
    }

    if let Some(content) = item.first("content") {
        return element_url(content);
    }

    if let Some(enclosure) = item
        .elements("enclosure")
        .find(|el| el.attr("type").is_some_and(|t| t.starts_with("image")))
    {
        return element_url(enclosure);
    }

    let body = item
        .first_text("encoded")
        .or_else(|| item.first_text("description"))?;
    IMG_SRC
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|src| src.as_str().to_owned())
}

fn element_url(element: &FeedElement) -> Option<String> {
    element
        .attr("url")
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
}

fn parse_publish_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|value| {
        // RSS convention is RFC 2822; some generators emit RFC 3339.
        DateTime::parse_from_rfc2822(value)
            .or_else(|_| DateTime::parse_from_rfc3339(value))
            .ok()
    })
    .map(|date| date.with_timezone(&Utc))
    .unwrap_or_else(Utc::now)
}
