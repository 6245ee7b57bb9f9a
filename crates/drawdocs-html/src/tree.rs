//! Tree node representation of page HTML.

use crate::entities::decode_entities;
use crate::parser;
use crate::serializer;

/// Node in the parsed HTML tree.
#[derive(Debug, Clone)]
pub enum HtmlNode {
    /// An element with tag, attributes and children.
    Element(Element),
    /// Text content, stored exactly as it appeared in the source
    /// (entity references are not decoded).
    Text(String),
    /// Markup emitted verbatim: comments, doctypes, processing
    /// instructions, raw-text element bodies and synthesized fragments.
    Raw(String),
}

/// Element node.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Tag name, lowercased.
    pub tag: String,
    /// Attributes in source order; names lowercased, values undecoded.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<HtmlNode>,
}

impl Element {
    /// Create a new element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Get an attribute value with entity references decoded.
    ///
    /// Lookup is case-insensitive; the first match wins.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| decode_entities(value).into_owned())
    }

    /// Check whether an attribute is present, regardless of its value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

/// Parsed HTML document: a sequence of top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    /// Top-level nodes in document order.
    pub nodes: Vec<HtmlNode>,
}

impl HtmlDocument {
    /// Parse HTML into a tree. Never fails; malformed markup degrades to
    /// text or is closed at end of input.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        parser::parse(html)
    }

    /// Serialize the tree back to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        serializer::serialize(self)
    }

    /// Replace elements in place, walking depth-first in document order.
    ///
    /// `f` is called for every element; returning `Ok(Some(node))` swaps the
    /// element (and its subtree) for `node`, `Ok(None)` leaves it in place
    /// and descends into its children.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by `f` and propagates it.
    pub fn try_replace_elements<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&Element) -> Result<Option<HtmlNode>, E>,
    {
        replace_in(&mut self.nodes, f)
    }
}

fn replace_in<E, F>(nodes: &mut [HtmlNode], f: &mut F) -> Result<(), E>
where
    F: FnMut(&Element) -> Result<Option<HtmlNode>, E>,
{
    for node in nodes.iter_mut() {
        let replacement = match node {
            HtmlNode::Element(el) => f(el)?,
            HtmlNode::Text(_) | HtmlNode::Raw(_) => None,
        };
        if let Some(new_node) = replacement {
            *node = new_node;
        } else if let HtmlNode::Element(el) = node {
            replace_in(&mut el.children, f)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_attr_decodes_entities() {
        let el = Element::new("img").with_attr("src", "a&amp;b.drawio");
        assert_eq!(el.attr("src"), Some("a&b.drawio".to_owned()));
    }

    #[test]
    fn test_attr_case_insensitive() {
        let el = Element::new("img").with_attr("SRC", "x.drawio");
        assert_eq!(el.attr("src"), Some("x.drawio".to_owned()));
        assert!(el.has_attr("Src"));
    }

    #[test]
    fn test_attr_missing() {
        let el = Element::new("img");
        assert_eq!(el.attr("src"), None);
        assert!(!el.has_attr("src"));
    }

    #[test]
    fn test_replace_elements_in_document_order() {
        let mut doc = HtmlDocument::parse("<p><em>a</em></p><em>b</em>");
        let mut seen = Vec::new();
        doc.try_replace_elements(&mut |el: &Element| -> Result<Option<HtmlNode>, ()> {
            seen.push(el.tag.clone());
            Ok(None)
        })
        .unwrap();
        assert_eq!(seen, vec!["p", "em", "em"]);
    }

    #[test]
    fn test_replace_elements_swaps_subtree() {
        let mut doc = HtmlDocument::parse("<p>before <span>old</span> after</p>");
        doc.try_replace_elements(&mut |el: &Element| -> Result<Option<HtmlNode>, ()> {
            if el.tag == "span" {
                Ok(Some(HtmlNode::Raw("<b>new</b>".to_owned())))
            } else {
                Ok(None)
            }
        })
        .unwrap();
        assert_eq!(doc.to_html(), "<p>before <b>new</b> after</p>");
    }

    #[test]
    fn test_replace_elements_propagates_error() {
        let mut doc = HtmlDocument::parse("<p><span>x</span></p>");
        let result = doc.try_replace_elements(&mut |el: &Element| {
            if el.tag == "span" {
                Err("boom")
            } else {
                Ok(None)
            }
        });
        assert_eq!(result, Err("boom"));
    }
}
