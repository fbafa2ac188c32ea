//! Generic captured representation of one RSS `<item>` subtree.
//!
//! Feeds disagree on namespace prefixes (`dc:creator` vs `creator`,
//! `media:thumbnail` vs `thumbnail`), so lookups match on the bare local
//! name and accept any prefix. Elements are kept in document order; the
//! first match wins, mirroring `querySelector` semantics in the DOM-based
//! consumers this feed originally served.

/// One descendant element of an `<item>`, flattened out of the subtree.
#[derive(Debug, Clone)]
pub struct FeedElement {
    prefix: Option<String>,
    local: String,
    attributes: Vec<(String, String)>,
    text: String,
}

impl FeedElement {
    pub(crate) fn new(
        prefix: Option<String>,
        local: String,
        attributes: Vec<(String, String)>,
    ) -> Self {
        Self {
            prefix,
            local,
            attributes,
            text: String::new(),
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Local part of the element name, without any namespace prefix.
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Name as written in the document, e.g. `media:thumbnail` or `title`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local),
            None => self.local.clone(),
        }
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Accumulated text content (text and CDATA nodes, entities decoded).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// All descendant elements of a single `<item>`, in document order.
#[derive(Debug, Clone, Default)]
pub struct ItemNode {
    children: Vec<FeedElement>,
}

impl ItemNode {
    pub(crate) fn from_elements(children: Vec<FeedElement>) -> Self {
        Self { children }
    }

    /// First element whose local name matches, regardless of prefix.
    pub fn first(&self, local: &str) -> Option<&FeedElement> {
        self.children.iter().find(|el| el.local == local)
    }

    /// All elements whose local name matches, in document order.
    pub fn elements<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a FeedElement> + 'a {
        self.children.iter().filter(move |el| el.local == local)
    }

    /// Trimmed text of the first matching element, if non-empty.
    ///
    /// Deliberately does not scan past the first match: an element that is
    /// present but empty makes the whole lookup miss, so the caller's
    /// fallback chain advances to its next source instead of a later
    /// sibling. This matches `querySelector(..)?.textContent || fallback`.
    pub fn first_text(&self, local: &str) -> Option<&str> {
        self.first(local)
            .map(|el| el.text().trim())
            .filter(|text| !text.is_empty())
    }
}
