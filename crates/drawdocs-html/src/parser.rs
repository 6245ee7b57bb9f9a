//! Tolerant HTML parser.
//!
//! Hand-written tokenizer rather than an XML reader: rendered HTML5 carries
//! unclosed void elements (`<img>`, `<br>`, `<meta>`) and raw-text bodies
//! that are not well-formed XML. Anything the tokenizer cannot interpret as
//! markup falls back to literal text, so parsing never fails.

use crate::tree::{Element, HtmlDocument, HtmlNode};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose body is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

pub(crate) fn parse(html: &str) -> HtmlDocument {
    let parser = Parser {
        input: html,
        pos: 0,
        root: Vec::new(),
        stack: Vec::new(),
    };
    parser.run()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    root: Vec<HtmlNode>,
    stack: Vec<Element>,
}

impl Parser<'_> {
    fn run(mut self) -> HtmlDocument {
        while self.pos < self.input.len() {
            match self.input[self.pos..].find('<') {
                None => {
                    self.push_text(self.pos, self.input.len());
                    self.pos = self.input.len();
                }
                Some(offset) => {
                    let lt = self.pos + offset;
                    self.push_text(self.pos, lt);
                    self.pos = lt;
                    self.markup();
                }
            }
        }

        // Close anything still open at end of input.
        while let Some(el) = self.stack.pop() {
            self.append(HtmlNode::Element(el));
        }

        HtmlDocument { nodes: self.root }
    }

    fn markup(&mut self) {
        let rest = &self.input[self.pos..];
        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .map_or(self.input.len(), |i| self.pos + i + 3);
            self.append(HtmlNode::Raw(self.input[self.pos..end].to_owned()));
            self.pos = end;
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Doctype or processing instruction, kept verbatim.
            let end = rest
                .find('>')
                .map_or(self.input.len(), |i| self.pos + i + 1);
            self.append(HtmlNode::Raw(self.input[self.pos..end].to_owned()));
            self.pos = end;
        } else if rest.starts_with("</") {
            self.end_tag();
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.start_tag();
        } else {
            // Stray '<' is literal text.
            self.append(HtmlNode::Text("<".to_owned()));
            self.pos += 1;
        }
    }

    fn end_tag(&mut self) {
        let Some(close) = self.input[self.pos..].find('>').map(|i| self.pos + i) else {
            self.append(HtmlNode::Text(self.input[self.pos..].to_owned()));
            self.pos = self.input.len();
            return;
        };
        let name = self.input[self.pos + 2..close].trim().to_ascii_lowercase();
        self.pos = close + 1;

        // Close up to and including the nearest matching open element.
        // An end tag with no open counterpart is dropped.
        if let Some(idx) = self.stack.iter().rposition(|el| el.tag == name) {
            while self.stack.len() > idx {
                if let Some(el) = self.stack.pop() {
                    self.append(HtmlNode::Element(el));
                }
            }
        }
    }

    fn start_tag(&mut self) {
        let bytes = self.input.as_bytes();
        let mut i = self.pos + 1;
        let name_start = i;
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b':')
        {
            i += 1;
        }
        let mut el = Element::new(self.input[name_start..i].to_ascii_lowercase());

        let mut self_closing = false;
        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            if bytes[i] == b'>' {
                i += 1;
                break;
            }
            if bytes[i] == b'/' {
                if i + 1 < bytes.len() && bytes[i + 1] == b'>' {
                    self_closing = true;
                    i += 2;
                    break;
                }
                i += 1;
                continue;
            }

            let attr_start = i;
            while i < bytes.len()
                && !bytes[i].is_ascii_whitespace()
                && bytes[i] != b'='
                && bytes[i] != b'>'
                && bytes[i] != b'/'
            {
                i += 1;
            }
            if i == attr_start {
                i += 1;
                continue;
            }
            let name = self.input[attr_start..i].to_ascii_lowercase();

            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let mut value = String::new();
            if i < bytes.len() && bytes[i] == b'=' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                    let quote = bytes[i];
                    i += 1;
                    let value_start = i;
                    while i < bytes.len() && bytes[i] != quote {
                        i += 1;
                    }
                    value = self.input[value_start..i].to_owned();
                    if i < bytes.len() {
                        i += 1;
                    }
                } else {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = self.input[value_start..i].to_owned();
                }
            }
            el.attrs.push((name, value));
        }
        self.pos = i;

        if self_closing || is_void(&el.tag) {
            self.append(HtmlNode::Element(el));
        } else if is_raw_text(&el.tag) {
            self.raw_text_body(el);
        } else {
            self.stack.push(el);
        }
    }

    /// Consume the raw body of a `<script>`/`<style>` element up to its
    /// case-insensitive end tag.
    fn raw_text_body(&mut self, mut el: Element) {
        let needle = format!("</{}", el.tag);
        let lower = self.input[self.pos..].to_ascii_lowercase();
        match lower.find(&needle) {
            Some(offset) => {
                let body_end = self.pos + offset;
                if body_end > self.pos {
                    el.children
                        .push(HtmlNode::Raw(self.input[self.pos..body_end].to_owned()));
                }
                self.pos = self.input[body_end..]
                    .find('>')
                    .map_or(self.input.len(), |i| body_end + i + 1);
            }
            None => {
                el.children
                    .push(HtmlNode::Raw(self.input[self.pos..].to_owned()));
                self.pos = self.input.len();
            }
        }
        self.append(HtmlNode::Element(el));
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start < end {
            self.append(HtmlNode::Text(self.input[start..end].to_owned()));
        }
    }

    fn append(&mut self, node: HtmlNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }
}
