//! Serialize the HTML tree back to markup.

use std::fmt::Write;

use crate::parser::is_void;
use crate::tree::{Element, HtmlDocument, HtmlNode};

pub(crate) fn serialize(doc: &HtmlDocument) -> String {
    let mut out = String::with_capacity(4096);
    for node in &doc.nodes {
        serialize_node(node, &mut out);
    }
    out
}

fn serialize_node(node: &HtmlNode, out: &mut String) {
    match node {
        HtmlNode::Text(text) | HtmlNode::Raw(text) => out.push_str(text),
        HtmlNode::Element(el) => serialize_element(el, out),
    }
}

fn serialize_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);

    for (name, value) in &el.attrs {
        if value.is_empty() {
            write!(out, " {name}").unwrap();
        } else if value.contains('"') {
            // Values parsed from single-quoted attributes may carry a
            // literal double quote.
            write!(out, r#" {}="{}""#, name, value.replace('"', "&quot;")).unwrap();
        } else {
            write!(out, r#" {name}="{value}""#).unwrap();
        }
    }
    out.push('>');

    if is_void(&el.tag) {
        return;
    }

    for child in &el.children {
        serialize_node(child, out);
    }
    write!(out, "</{}>", el.tag).unwrap();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serialize_element_with_attrs() {
        let el = Element::new("div")
            .with_attr("class", "box")
            .with_attr("data-page", "0");
        let doc = HtmlDocument {
            nodes: vec![HtmlNode::Element(el)],
        };
        assert_eq!(doc.to_html(), r#"<div class="box" data-page="0"></div>"#);
    }

    #[test]
    fn test_serialize_void_has_no_close_tag() {
        let doc = HtmlDocument {
            nodes: vec![HtmlNode::Element(Element::new("img").with_attr("src", "x"))],
        };
        assert_eq!(doc.to_html(), r#"<img src="x">"#);
    }

    #[test]
    fn test_serialize_quote_in_value() {
        let el = Element::new("span").with_attr("title", r#"say "hi""#);
        let doc = HtmlDocument {
            nodes: vec![HtmlNode::Element(el)],
        };
        assert_eq!(doc.to_html(), r#"<span title="say &quot;hi&quot;"></span>"#);
    }

    #[test]
    fn test_serialize_raw_verbatim() {
        let doc = HtmlDocument {
            nodes: vec![HtmlNode::Raw("<!-- c -->".to_owned())],
        };
        assert_eq!(doc.to_html(), "<!-- c -->");
    }
}
