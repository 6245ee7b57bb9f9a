//! Error types for diagram embedding.

use std::path::PathBuf;

/// Per-marker embedding failure.
///
/// All variants are recoverable by default: the rewriter turns them into
/// placeholder fragments and keeps processing the page. Under strict mode
/// they escalate to [`TransformError`].
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The reference does not resolve to an existing regular file.
    #[error("diagram file not found: {reference}")]
    PathNotFound {
        /// The reference string as written by the author.
        reference: String,
    },

    /// The resolved file escapes the site root while containment is enforced.
    #[error("diagram file outside site root: {}", path.display())]
    OutsideSiteRoot {
        /// The resolved absolute path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read {}: {message}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },

    /// The file content is not well-formed XML.
    #[error("diagram file {} is not well-formed XML: {message}", path.display())]
    MalformedDiagram {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parser error text.
        message: String,
    },

    /// The selected page index exceeds the document's page count.
    #[error("page index {index} out of range: {} has {pages} page(s)", path.display())]
    PageIndexOutOfRange {
        /// Requested zero-based page index.
        index: usize,
        /// Number of pages in the document.
        pages: usize,
        /// Path of the diagram file.
        path: PathBuf,
    },
}

impl EmbedError {
    /// Short machine-readable kind, used in logs and placeholders.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PathNotFound { .. } => "path-not-found",
            Self::OutsideSiteRoot { .. } => "outside-site-root",
            Self::Io { .. } => "io",
            Self::MalformedDiagram { .. } => "malformed-diagram",
            Self::PageIndexOutOfRange { .. } => "page-index-out-of-range",
        }
    }
}

/// Build-fatal transform failure (strict mode).
///
/// Identifies the page, the offending reference and its position so the
/// build log points straight at the marker.
#[derive(Debug, thiserror::Error)]
#[error("page {}: diagram marker #{marker} ({reference}): {source}", page.display())]
pub struct TransformError {
    /// Source path of the page being transformed.
    pub page: PathBuf,
    /// The reference string of the failing marker.
    pub reference: String,
    /// Zero-based marker position in document order.
    pub marker: usize,
    /// The underlying per-marker failure.
    #[source]
    pub source: EmbedError,
}
