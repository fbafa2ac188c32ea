//! The RSS-to-article pipeline.
//!
//! Three stages, leaves first:
//!
//! - [`parser`] — tolerant `<item>` extraction over `quick-xml`
//! - [`normalizer`] — per-item fallback chains producing [`Article`]s
//! - [`fetcher`] — the HTTP boundary that feeds raw text into the above
//!
//! [`parse_articles`] is the synchronous bytes-in/records-out entry point;
//! [`load_articles`] wraps it behind a single HTTP request.
//!
//! [`Article`]: crate::article::Article

mod fetcher;
mod item;
mod normalizer;
mod parser;

pub use fetcher::{load_articles, FeedOutcome, FetchError, DEFAULT_FEED_URL};
pub use item::{FeedElement, ItemNode};
pub use normalizer::{
    discover_image, normalize, placeholder_image, DEFAULT_AUTHOR, DEFAULT_TITLE, DEFAULT_URL,
    EXCERPT_MAX_CHARS,
};
pub use parser::parse_feed;

use crate::article::Article;

/// Runs the full pipeline on raw feed text: one [`Article`] per parseable
/// RSS `<item>`, in document order.
///
/// Total over arbitrary input — malformed XML yields an empty list, and
/// missing fields resolve through their fallback chains. Each call builds
/// fresh records; there is no shared state between calls.
pub fn parse_articles(raw: &str) -> Vec<Article> {
    parse_feed(raw)
        .iter()
        .enumerate()
        .map(|(index, item)| normalize(item, index))
        .collect()
}
