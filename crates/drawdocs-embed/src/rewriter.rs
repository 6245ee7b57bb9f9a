//! Page markup rewriting.
//!
//! Scans a page's HTML for diagram embed markers and replaces each one with
//! an interactive embed fragment. One broken reference never aborts the
//! page: failures become placeholders unless strict mode is enabled.

use drawdocs_html::{Element, HtmlDocument, HtmlNode, decode_entities};

use crate::context::PageContext;
use crate::error::{EmbedError, TransformError};
use crate::fragment;
use crate::loader;
use crate::options::{self, EmbedDefaults, EmbedOverrides};
use crate::path::{self, Reference, ResolvedRef};
use crate::report;

/// File extension of diagram references (case-insensitive).
pub const DIAGRAM_EXTENSION: &str = ".drawio";

/// Tag of the explicit embed-block element.
const EMBED_TAG: &str = "drawio-embed";

/// Page transform engine.
///
/// Construct once per build with the plugin-wide defaults, then call
/// [`transform`](Self::transform) once per page. Holds no mutable state, so
/// one instance can be shared across parallel page builds.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    defaults: EmbedDefaults,
    strict: bool,
    enforce_site_root: bool,
}

impl Rewriter {
    /// Create a rewriter with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the plugin-wide default embed options.
    #[must_use]
    pub fn with_defaults(mut self, defaults: EmbedDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Escalate per-marker failures to build-fatal errors.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reject diagram files that resolve outside the site root.
    #[must_use]
    pub fn enforce_site_root(mut self, enforce: bool) -> Self {
        self.enforce_site_root = enforce;
        self
    }

    /// Transform one page, replacing every embed marker in document order.
    ///
    /// Non-marker content is preserved; a page without diagram references is
    /// returned unchanged without parsing. Re-running the transform on its
    /// own output is a no-op: emitted fragments never match the marker
    /// predicate.
    ///
    /// # Errors
    ///
    /// Only in strict mode, when any marker fails to embed.
    pub fn transform(&self, html: &str, ctx: &PageContext) -> Result<String, TransformError> {
        if !html.to_ascii_lowercase().contains(DIAGRAM_EXTENSION) {
            return Ok(html.to_owned());
        }

        let mut doc = HtmlDocument::parse(html);
        let mut markers = 0usize;

        doc.try_replace_elements(&mut |el: &Element| {
            let Some(raw) = marker_reference(el) else {
                return Ok(None);
            };
            let reference = Reference::parse(&raw);

            // External references are never embedded; the marker stays an
            // ordinary link/image.
            if path::is_external(&reference.path) {
                return Ok(None);
            }

            let position = markers;
            markers += 1;

            match self.embed(el, &reference, ctx) {
                Ok(node) => Ok(node),
                Err(error) => report::report(self.strict, error, position, &raw, ctx).map(Some),
            }
        })?;

        tracing::debug!(
            page = %ctx.source_path.display(),
            markers,
            "diagram markers processed"
        );
        Ok(doc.to_html())
    }

    /// Resolve, load, merge and synthesize for one marker.
    fn embed(
        &self,
        el: &Element,
        reference: &Reference,
        ctx: &PageContext,
    ) -> Result<Option<HtmlNode>, EmbedError> {
        let resolved = match path::resolve(&reference.path, ctx, self.enforce_site_root)? {
            ResolvedRef::External => return Ok(None),
            ResolvedRef::Local(path) => path,
        };
        let document = loader::load(&resolved)?;

        let decoded: Vec<(String, String)> = el
            .attrs
            .iter()
            .map(|(name, value)| (name.clone(), decode_entities(value).into_owned()))
            .collect();
        let mut inline =
            EmbedOverrides::from_marker_attrs(decoded.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        // An explicit page attribute wins over a #N suffix on the src.
        if inline.page.is_none() {
            inline.page = reference.page;
        }

        let config = options::merge(&self.defaults, &ctx.overrides, &inline);
        let page = document
            .page(config.page_index)
            .ok_or(EmbedError::PageIndexOutOfRange {
                index: config.page_index,
                pages: document.pages.len(),
                path: resolved,
            })?;

        Ok(Some(fragment::diagram_fragment(page, &config)))
    }
}

/// Marker predicate: the decoded reference string, if this element is an
/// embed marker.
///
/// Markers are `<img>` elements whose `src` path part carries the diagram
/// extension, or explicit `<drawio-embed src=…>` elements.
fn marker_reference(el: &Element) -> Option<String> {
    let src = el.attr("src")?;
    match el.tag.as_str() {
        tag if tag == EMBED_TAG => Some(src),
        "img" => {
            let reference = Reference::parse(&src);
            reference
                .path
                .to_ascii_lowercase()
                .ends_with(DIAGRAM_EXTENSION)
                .then_some(src)
        }
        _ => None,
    }
}
