//! Embed fragment synthesis.
//!
//! The fragment markup is the wire contract with the client-side viewer
//! script: a container `<div>` carrying the diagram payload and every
//! effective option as a data attribute. Error placeholders share the
//! container class so site CSS can target both.

use std::fmt::Write;

use drawdocs_html::{HtmlNode, escape_attr, escape_text};

use crate::error::EmbedError;
use crate::loader::DiagramPage;
use crate::options::EffectiveConfig;

/// Class of every emitted container element.
pub const FRAGMENT_CLASS: &str = "drawio-diagram";

/// Additional class on error placeholders.
pub const ERROR_CLASS: &str = "drawio-error";

/// Attribute carrying the diagram payload.
pub const PAYLOAD_ATTR: &str = "data-diagram";

/// Build the replacement fragment for a successfully resolved marker.
#[must_use]
pub fn diagram_fragment(page: &DiagramPage, config: &EffectiveConfig) -> HtmlNode {
    let mut out = String::with_capacity(page.content.len() + 256);
    write!(
        out,
        r#"<div class="{FRAGMENT_CLASS}" {PAYLOAD_ATTR}="{payload}" data-toolbar="{toolbar}" data-tooltips="{tooltips}" data-edit="{edit}" data-border="{border}" data-page="{page_index}" data-resize="{resize}"></div>"#,
        payload = escape_attr(&page.content),
        toolbar = config.toolbar,
        tooltips = config.tooltips,
        edit = config.edit,
        border = config.border,
        page_index = config.page_index,
        resize = config.resize,
    )
    .unwrap();
    HtmlNode::Raw(out)
}

/// Build a visible placeholder for a failed marker (permissive mode).
#[must_use]
pub fn placeholder_fragment(error: &EmbedError, reference: &str) -> HtmlNode {
    HtmlNode::Raw(format!(
        r#"<div class="{FRAGMENT_CLASS} {ERROR_CLASS}" data-error="{kind}"><pre>Diagram embed failed ({kind}): {message}: {reference}</pre></div>"#,
        kind = error.kind(),
        message = escape_text(&error.to_string()),
        reference = escape_text(reference),
    ))
}
