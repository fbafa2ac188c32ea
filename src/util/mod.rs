//! Utility functions shared across the pipeline.
//!
//! Currently text processing only: HTML tag stripping with entity
//! decoding, and character-count truncation for excerpts.

mod html;

pub use html::{strip_html, truncate_chars};
