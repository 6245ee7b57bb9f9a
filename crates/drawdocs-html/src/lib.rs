//! Tagged HTML tree for page post-processing.
//!
//! Parses rendered page HTML into an explicit [`HtmlNode`] tree, supports
//! typed in-place node replacement, and serializes back to markup. The
//! parser is tolerant of real-world HTML5: void elements, raw-text elements
//! (`<script>`, `<style>`), comments, doctypes and unmatched end tags all
//! survive a parse/serialize round trip.
//!
//! Text and attribute values are stored exactly as they appear in the
//! source; entity references are only decoded on access (see
//! [`Element::attr`]) so untouched page content is never rewritten.

mod entities;
mod parser;
mod serializer;
mod tree;

pub use entities::{decode_entities, escape_attr, escape_text};
pub use tree::{Element, HtmlDocument, HtmlNode};
