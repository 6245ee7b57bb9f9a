//! Diagram file loading and page extraction.
//!
//! A draw.io file is an XML container (`<mxfile>`) holding zero or more
//! `<diagram>` nodes, one per page. The loader validates well-formedness by
//! scanning every event and slices each page's content byte-exact from the
//! source text, so the embedded payload matches the file. No caching: each
//! marker re-reads its file (diagram files are small and builds are
//! cold-start batch runs).

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::EmbedError;

/// Parsed diagram file content.
#[derive(Debug, Clone)]
pub struct DiagramDocument {
    /// Path the document was loaded from.
    pub source_path: PathBuf,
    /// Pages in file order.
    pub pages: Vec<DiagramPage>,
}

impl DiagramDocument {
    /// Look up a page by zero-based index.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&DiagramPage> {
        self.pages.get(index)
    }
}

/// One page of a diagram file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramPage {
    /// Zero-based position in the file.
    pub index: usize,
    /// The page's `name` attribute, if present.
    pub name: Option<String>,
    /// Raw inner markup of the `<diagram>` node, byte-exact.
    pub content: String,
}

/// Read and parse a diagram file.
///
/// # Errors
///
/// `PathNotFound` if the file vanished since resolution, `Io` for other
/// read failures, `MalformedDiagram` if the content is not well-formed XML.
pub fn load(path: &Path) -> Result<DiagramDocument, EmbedError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EmbedError::PathNotFound {
                reference: path.display().to_string(),
            }
        } else {
            EmbedError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })?;
    parse_document(&text, path)
}

/// Parse diagram XML, collecting `<diagram>` pages.
///
/// The whole input is scanned even after the last page so that trailing
/// garbage still fails as malformed.
#[allow(clippy::cast_possible_truncation)]
fn parse_document(text: &str, path: &Path) -> Result<DiagramDocument, EmbedError> {
    let malformed = |message: String| EmbedError::MalformedDiagram {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = true;

    let mut pages: Vec<DiagramPage> = Vec::new();
    // Content start offset and name of the page being scanned.
    let mut pending: Option<(usize, Option<String>)> = None;
    // Nested <diagram> elements inside a page body stay part of its content.
    let mut nested = 0usize;

    loop {
        match reader.read_event() {
            Err(e) => return Err(malformed(e.to_string())),
            Ok(Event::Start(e)) if is_diagram(&e) => {
                if pending.is_some() {
                    nested += 1;
                } else {
                    let name = page_name(&e).map_err(&malformed)?;
                    pending = Some((reader.buffer_position() as usize, name));
                }
            }
            Ok(Event::Empty(e)) if is_diagram(&e) && pending.is_none() => {
                let name = page_name(&e).map_err(&malformed)?;
                pages.push(DiagramPage {
                    index: pages.len(),
                    name,
                    content: String::new(),
                });
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"diagram" => {
                if nested > 0 {
                    nested -= 1;
                } else if let Some((start, name)) = pending.take() {
                    // The end event finishes at buffer_position; the raw tag
                    // is "</" + content + ">".
                    let end = reader.buffer_position() as usize - (e.len() + 3);
                    pages.push(DiagramPage {
                        index: pages.len(),
                        name,
                        content: text[start..end].to_owned(),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
        }
    }

    Ok(DiagramDocument {
        source_path: path.to_path_buf(),
        pages,
    })
}

fn is_diagram(e: &BytesStart<'_>) -> bool {
    e.name().as_ref() == b"diagram"
}

/// Decode the `name` attribute of a page node.
fn page_name(e: &BytesStart<'_>) -> Result<Option<String>, String> {
    let attr = e.try_get_attribute("name").map_err(|e| e.to_string())?;
    match attr {
        Some(attr) => {
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Result<DiagramDocument, EmbedError> {
        parse_document(text, Path::new("test.drawio"))
    }

    #[test]
    fn test_single_page() {
        let doc = parse(r#"<mxfile><diagram name="Page-1">abc</diagram></mxfile>"#).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].index, 0);
        assert_eq!(doc.pages[0].name.as_deref(), Some("Page-1"));
        assert_eq!(doc.pages[0].content, "abc");
    }

    #[test]
    fn test_multiple_pages_in_file_order() {
        let doc = parse(
            r#"<mxfile><diagram name="a">A</diagram><diagram name="b">B</diagram><diagram>C</diagram></mxfile>"#,
        )
        .unwrap();
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.pages[0].content, "A");
        assert_eq!(doc.pages[1].content, "B");
        assert_eq!(doc.pages[2].content, "C");
        assert_eq!(doc.pages[2].name, None);
        assert_eq!(doc.page(1).unwrap().name.as_deref(), Some("b"));
        assert!(doc.page(3).is_none());
    }

    #[test]
    fn test_page_content_byte_exact() {
        let inner = r#"<mxGraphModel dx="1" dy="2">
  <root><mxCell id="0" value="a &amp; b"/></root>
</mxGraphModel>"#;
        let text = format!(r#"<mxfile host="app"><diagram id="x">{inner}</diagram></mxfile>"#);
        let doc = parse(&text).unwrap();
        assert_eq!(doc.pages[0].content, inner);
    }

    #[test]
    fn test_compressed_text_page() {
        let doc = parse("<mxfile><diagram>jZJNT4QwEIZ/TY8mfKjrHhXUPXgy8Q==</diagram></mxfile>")
            .unwrap();
        assert_eq!(doc.pages[0].content, "jZJNT4QwEIZ/TY8mfKjrHhXUPXgy8Q==");
    }

    #[test]
    fn test_self_closing_page_is_empty() {
        let doc = parse(r#"<mxfile><diagram name="empty"/></mxfile>"#).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].content, "");
    }

    #[test]
    fn test_zero_pages_is_valid() {
        let doc = parse("<mxfile host=\"app\"></mxfile>").unwrap();
        assert!(doc.pages.is_empty());
    }

    #[test]
    fn test_malformed_is_error() {
        let err = parse("<mxfile><diagram>oops</mxfile>").unwrap_err();
        assert!(matches!(err, EmbedError::MalformedDiagram { .. }));
        let err = parse("not xml at <all").unwrap_err();
        assert!(matches!(err, EmbedError::MalformedDiagram { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/definitely/missing.drawio")).unwrap_err();
        assert!(matches!(err, EmbedError::PathNotFound { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.drawio");
        std::fs::write(&file, r#"<mxfile><diagram name="d">X</diagram></mxfile>"#).unwrap();

        let doc = load(&file).unwrap();
        assert_eq!(doc.source_path, file);
        assert_eq!(doc.pages[0].content, "X");
    }
}
