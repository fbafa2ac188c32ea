use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized feed article, ready for the dashboard grid.
///
/// Every field is always populated: normalization substitutes a defined
/// fallback wherever the source item is missing or unusable, so consumers
/// never need to handle partial records. Field names serialize in camelCase
/// for the JSON display boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Stable per-item identifier. `<guid>` text, or `article-{index}`
    /// when the source lacks one.
    pub id: String,
    /// Article headline, `"Untitled"` when absent.
    pub title: String,
    /// Byline. `<author>`, then `<dc:creator>`, then the team default.
    pub author: String,
    /// Publication timestamp. Falls back to the time of the parse call
    /// when `<pubDate>` is missing or unparsable.
    pub publish_date: DateTime<Utc>,
    /// Plain-text teaser: `<description>` with HTML stripped, hard-cut at
    /// 200 characters. Empty when the item has no description.
    pub excerpt: String,
    /// Link to the full article, `"#"` when absent.
    pub url: String,
    /// Image URL resolved via the discovery chain, or the deterministic
    /// per-index placeholder when no image is found.
    pub featured_image: String,
    /// `<category>` texts in document order. Duplicates are preserved.
    pub categories: Vec<String>,
}
