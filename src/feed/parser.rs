//! Tolerant extraction of RSS `<item>` subtrees.
//!
//! [`parse_feed`] is a total function: whatever the upstream feed sends,
//! the caller gets a (possibly empty) list of captured items and never an
//! error. Malformed XML discards the whole document, matching the strict
//! all-or-nothing behavior of a DOM `DOMParser` surfacing a
//! `parsererror` node.
//!
//! XXE: quick-xml (0.37) never parses `<!ENTITY>` declarations from a
//! DOCTYPE; entity resolution covers only the five XML builtins, so custom
//! entities fail the unescape step and the document is discarded.

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use super::item::{FeedElement, ItemNode};

/// Internal parse failures. Collapsed to an empty item list (plus an
/// error-level log) before reaching any caller.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying XML reader rejected the document.
    #[error("XML parse error: {0}")]
    Xml(String),
    /// The document ended while elements were still open.
    #[error("document truncated inside <{0}>")]
    Truncated(String),
}

/// Parses raw feed text into one [`ItemNode`] per RSS `<item>`, in
/// document order.
///
/// Only RSS `<item>` elements are recognized; Atom `<entry>` feeds yield
/// an empty list. Returns an empty `Vec` (never an error) when the
/// document is not well-formed XML.
pub fn parse_feed(raw: &str) -> Vec<ItemNode> {
    match extract_items(raw) {
        Ok(items) => {
            tracing::debug!(items = items.len(), "extracted feed items");
            items
        }
        Err(error) => {
            tracing::error!(error = %error, "discarding malformed feed");
            Vec::new()
        }
    }
}

/// Accumulates the descendant elements of one `<item>` while the event
/// loop walks its subtree.
struct ItemCapture {
    /// Open-element stack depth at which the `<item>` itself sits.
    base_depth: usize,
    children: Vec<FeedElement>,
    /// Indices into `children` for elements still open. Text nodes append
    /// to every open ancestor, mirroring DOM `textContent`.
    open: Vec<usize>,
}

impl ItemCapture {
    fn new(base_depth: usize) -> Self {
        Self {
            base_depth,
            children: Vec::new(),
            open: Vec::new(),
        }
    }

    fn open_element(
        &mut self,
        prefix: Option<String>,
        local: String,
        attributes: Vec<(String, String)>,
    ) {
        let index = self.children.len();
        self.children.push(FeedElement::new(prefix, local, attributes));
        self.open.push(index);
    }

    fn close_element(&mut self) {
        self.open.pop();
    }

    fn append_text(&mut self, text: &str) {
        for &index in &self.open {
            self.children[index].push_text(text);
        }
    }

    fn finish(self) -> ItemNode {
        ItemNode::from_elements(self.children)
    }
}

fn extract_items(raw: &str) -> Result<Vec<ItemNode>, ParseError> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    // Local names of every open element, document-wide. Lets us detect
    // truncated documents at EOF, which quick-xml otherwise tolerates.
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<ItemCapture> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let (prefix, local) = split_name(&start);
                if current.is_none() && local == "item" {
                    current = Some(ItemCapture::new(stack.len()));
                } else if let Some(capture) = current.as_mut() {
                    capture.open_element(prefix, local.clone(), read_attributes(&start, &reader));
                }
                stack.push(local);
            }
            Ok(Event::Empty(start)) => {
                let (prefix, local) = split_name(&start);
                if let Some(capture) = current.as_mut() {
                    capture.open_element(prefix, local, read_attributes(&start, &reader));
                    capture.close_element();
                } else if local == "item" {
                    // Self-closing <item/> still counts toward the output.
                    items.push(ItemNode::default());
                }
            }
            Ok(Event::End(_)) => {
                if stack.pop().is_none() {
                    return Err(ParseError::Xml("end tag without matching start".to_string()));
                }
                let item_closed = current
                    .as_ref()
                    .is_some_and(|capture| stack.len() == capture.base_depth);
                if item_closed {
                    if let Some(capture) = current.take() {
                        items.push(capture.finish());
                    }
                } else if let Some(capture) = current.as_mut() {
                    capture.close_element();
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(capture) = current.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|error| ParseError::Xml(error.to_string()))?;
                    capture.append_text(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(capture) = current.as_mut() {
                    capture.append_text(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Ok(Event::Eof) => {
                if let Some(open) = stack.last() {
                    return Err(ParseError::Truncated(open.clone()));
                }
                break;
            }
            Err(error) => return Err(ParseError::Xml(error.to_string())),
            _ => {}
        }
    }

    Ok(items)
}

/// Splits a tag name into `(prefix, local)`, e.g. `media:thumbnail` into
/// `(Some("media"), "thumbnail")`.
fn split_name(start: &BytesStart<'_>) -> (Option<String>, String) {
    let name = start.name();
    let (local, prefix) = name.decompose();
    (
        prefix.map(|p| String::from_utf8_lossy(p.into_inner()).into_owned()),
        String::from_utf8_lossy(local.into_inner()).into_owned(),
    )
}

/// Decodes the attributes of a start tag. Malformed or undecodable
/// attributes are skipped with a warning rather than failing the item.
fn read_attributes(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Vec<(String, String)> {
    let decoder = reader.decoder();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(error) => {
                tracing::warn!(error = %error, "skipping malformed attribute");
                continue;
            }
        };
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        match attr.decode_and_unescape_value(decoder) {
            Ok(value) => attributes.push((key, value.into_owned())),
            Err(error) => {
                tracing::warn!(attribute = %key, error = %error, "skipping undecodable attribute value");
            }
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_items_in_document_order() {
        let feed = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Blog</title>
    <item><guid>first</guid><title>One</title></item>
    <item><guid>second</guid><title>Two</title></item>
</channel></rss>"#;

        let items = parse_feed(feed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].first_text("guid"), Some("first"));
        assert_eq!(items[1].first_text("guid"), Some("second"));
    }

    #[test]
    fn channel_title_is_not_an_item_field() {
        let feed = r#"<rss><channel><title>Channel</title>
            <item><guid>a</guid></item></channel></rss>"#;

        let items = parse_feed(feed);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].first_text("title"), None);
    }

    #[test]
    fn unclosed_tag_discards_document() {
        let feed = "<rss><channel><item><title>Dangling</title>";
        assert!(parse_feed(feed).is_empty());
    }

    #[test]
    fn mismatched_end_tag_discards_document() {
        let feed = "<rss><channel><item><title>Broken</wrong></item></channel></rss>";
        assert!(parse_feed(feed).is_empty());
    }

    #[test]
    fn plain_garbage_yields_empty() {
        assert!(parse_feed("not xml at all").is_empty());
        assert!(parse_feed("").is_empty());
    }

    #[test]
    fn prefixed_elements_match_by_local_name() {
        let feed = r#"<rss xmlns:dc="http://purl.org/dc/elements/1.1/"><channel>
            <item><dc:creator>Jane Doe</dc:creator></item>
        </channel></rss>"#;

        let items = parse_feed(feed);
        assert_eq!(items[0].first_text("creator"), Some("Jane Doe"));
        let creator = items[0].first("creator").unwrap();
        assert_eq!(creator.qualified_name(), "dc:creator");
    }

    #[test]
    fn cdata_text_is_captured_verbatim() {
        let feed = r#"<rss><channel><item>
            <description><![CDATA[<p>Hello & welcome</p>]]></description>
        </item></channel></rss>"#;

        let items = parse_feed(feed);
        assert_eq!(
            items[0].first_text("description"),
            Some("<p>Hello & welcome</p>")
        );
    }

    #[test]
    fn escaped_entities_are_decoded_in_text() {
        let feed = r#"<rss><channel><item>
            <description>&lt;p&gt;Hi&lt;/p&gt;</description>
        </item></channel></rss>"#;

        let items = parse_feed(feed);
        assert_eq!(items[0].first_text("description"), Some("<p>Hi</p>"));
    }

    #[test]
    fn attributes_survive_on_self_closing_elements() {
        let feed = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel>
            <item><media:thumbnail url="https://example.com/t.jpg"/></item>
        </channel></rss>"#;

        let items = parse_feed(feed);
        let thumb = items[0].first("thumbnail").unwrap();
        assert_eq!(thumb.attr("url"), Some("https://example.com/t.jpg"));
    }

    #[test]
    fn nested_item_element_stays_inside_outer_item() {
        // A pathological feed nesting <item> inside <item>: the inner one
        // is captured as a child element, not as a second article.
        let feed = "<rss><channel><item><item><guid>inner</guid></item></item></channel></rss>";
        let items = parse_feed(feed);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].first_text("guid"), Some("inner"));
    }

    #[test]
    fn self_closing_item_counts() {
        let feed = "<rss><channel><item/><item><guid>x</guid></item></channel></rss>";
        let items = parse_feed(feed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].first_text("guid"), None);
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(input in ".*") {
            let _ = parse_feed(&input);
        }

        #[test]
        fn item_count_matches_source(n in 0usize..30) {
            let mut feed = String::from("<rss><channel>");
            for i in 0..n {
                feed.push_str(&format!("<item><guid>{i}</guid></item>"));
            }
            feed.push_str("</channel></rss>");
            prop_assert_eq!(parse_feed(&feed).len(), n);
        }
    }
}
