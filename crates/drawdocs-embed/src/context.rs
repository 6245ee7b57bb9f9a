//! Per-page transform context.

use std::path::{Path, PathBuf};

use crate::options::EmbedOverrides;

/// Immutable context for one page transform.
///
/// Supplied by the host pipeline; relative diagram references resolve
/// against the directory of `source_path`.
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Path of the page being built (the file relative references resolve
    /// against).
    pub source_path: PathBuf,
    /// Path the transformed page will be written to.
    pub output_path: PathBuf,
    /// Base directory of the site; absolute references resolve against it.
    pub site_root: PathBuf,
    /// Page-scoped embed option overrides (front matter or sidecar
    /// metadata, extracted by the host).
    pub overrides: EmbedOverrides,
}

impl PageContext {
    /// Create a context with no page-scoped overrides.
    #[must_use]
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        site_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: output_path.into(),
            site_root: site_root.into(),
            overrides: EmbedOverrides::default(),
        }
    }

    /// Attach page-scoped overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: EmbedOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Directory of the page source, used for relative reference resolution.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        self.source_path.parent().unwrap_or(&self.site_root)
    }
}
