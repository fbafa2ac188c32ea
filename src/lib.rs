//! RSS-to-article normalization pipeline for a blog dashboard grid.
//!
//! Turns raw RSS 2.0 XML into an ordered list of [`Article`] records.
//! The pipeline is a total function over arbitrary input: malformed feeds
//! yield an empty list, partially populated items fall back field by field,
//! and no error ever crosses into the display layer.
//!
//! # Pipeline
//!
//! ```text
//! raw XML -> feed::parser (item capture) -> feed::normalizer (per item) -> Vec<Article>
//! ```
//!
//! The HTTP boundary lives in [`feed::fetcher`]; everything downstream of it
//! is synchronous and side-effect free apart from diagnostic logging.

pub mod article;
pub mod feed;
pub mod util;

pub use article::Article;
pub use feed::{load_articles, parse_articles, FeedOutcome};
