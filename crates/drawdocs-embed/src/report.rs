//! Per-marker failure reporting.

use drawdocs_html::HtmlNode;

use crate::context::PageContext;
use crate::error::{EmbedError, TransformError};
use crate::fragment;

/// Report one marker failure.
///
/// Every failure is logged exactly once with page path, reference and error
/// kind. Permissive mode returns a placeholder fragment; strict mode
/// escalates to a [`TransformError`] that aborts the page.
///
/// # Errors
///
/// In strict mode, returns the escalated error.
pub(crate) fn report(
    strict: bool,
    error: EmbedError,
    marker: usize,
    reference: &str,
    ctx: &PageContext,
) -> Result<HtmlNode, TransformError> {
    tracing::error!(
        page = %ctx.source_path.display(),
        reference,
        kind = error.kind(),
        %error,
        "diagram embed failed"
    );

    if strict {
        return Err(TransformError {
            page: ctx.source_path.clone(),
            reference: reference.to_owned(),
            marker,
            source: error,
        });
    }
    Ok(fragment::placeholder_fragment(&error, reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PageContext {
        PageContext::new("/site/p.html", "/site/p.html", "/site")
    }

    fn not_found() -> EmbedError {
        EmbedError::PathNotFound {
            reference: "x.drawio".to_owned(),
        }
    }

    #[test]
    fn test_permissive_returns_placeholder() {
        let node = report(false, not_found(), 0, "x.drawio", &context()).unwrap();
        let HtmlNode::Raw(html) = node else {
            panic!("expected raw node");
        };
        assert!(html.contains("drawio-error"));
    }

    #[test]
    fn test_strict_escalates() {
        let err = report(true, not_found(), 2, "x.drawio", &context()).unwrap_err();
        assert_eq!(err.marker, 2);
        assert_eq!(err.reference, "x.drawio");
        assert!(matches!(err.source, EmbedError::PathNotFound { .. }));
    }
}
