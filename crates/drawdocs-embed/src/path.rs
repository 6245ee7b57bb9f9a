//! Diagram reference resolution.

use std::path::{Component, Path, PathBuf};

use crate::context::PageContext;
use crate::error::EmbedError;

/// A parsed diagram reference: path part plus optional page selector.
///
/// `diagrams/arch.drawio#2` selects page 2; a query suffix (`?v=3`) is
/// ignored for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Path part of the reference, selectors stripped.
    pub path: String,
    /// Page index from a `#N` suffix, if present and numeric.
    pub page: Option<usize>,
}

impl Reference {
    /// Split a raw reference into path and page selector.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let (before_fragment, fragment) = match raw.split_once('#') {
            Some((path, frag)) => (path, Some(frag)),
            None => (raw, None),
        };
        let path = before_fragment
            .split_once('?')
            .map_or(before_fragment, |(p, _)| p);
        Self {
            path: path.to_owned(),
            page: fragment.and_then(|f| f.parse().ok()),
        }
    }
}

/// Outcome of resolving a reference's path part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    /// A local diagram file, ready to load.
    Local(PathBuf),
    /// An external URL; left untouched by the rewriter.
    External,
}

/// Check whether a reference points outside the local file tree.
pub(crate) fn is_external(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//")
}

/// Resolve a reference path against the page's location.
///
/// Relative paths resolve lexically against the page's source directory;
/// absolute paths (`/...`) resolve against the site root. With
/// `enforce_site_root` the resolved path must stay under the site root.
///
/// # Errors
///
/// `PathNotFound` if no regular file exists at the resolved location;
/// `OutsideSiteRoot` if containment is enforced and violated.
pub fn resolve(
    reference: &str,
    ctx: &PageContext,
    enforce_site_root: bool,
) -> Result<ResolvedRef, EmbedError> {
    if is_external(reference) {
        return Ok(ResolvedRef::External);
    }

    let joined = if let Some(site_relative) = reference.strip_prefix('/') {
        ctx.site_root.join(site_relative)
    } else {
        ctx.source_dir().join(reference)
    };
    let resolved = normalize(&joined);

    if enforce_site_root && !resolved.starts_with(normalize(&ctx.site_root)) {
        return Err(EmbedError::OutsideSiteRoot { path: resolved });
    }

    if !resolved.is_file() {
        return Err(EmbedError::PathNotFound {
            reference: reference.to_owned(),
        });
    }

    Ok(ResolvedRef::Local(resolved))
}

/// Lexically normalize `.` and `..` segments.
///
/// `..` at the root is dropped rather than traversing above it.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_reference_parse_plain() {
        let r = Reference::parse("arch.drawio");
        assert_eq!(r.path, "arch.drawio");
        assert_eq!(r.page, None);
    }

    #[test]
    fn test_reference_parse_page_selector() {
        let r = Reference::parse("../diagrams/arch.drawio#2");
        assert_eq!(r.path, "../diagrams/arch.drawio");
        assert_eq!(r.page, Some(2));
    }

    #[test]
    fn test_reference_parse_query_stripped() {
        let r = Reference::parse("arch.drawio?v=3");
        assert_eq!(r.path, "arch.drawio");
        assert_eq!(r.page, None);
    }

    #[test]
    fn test_reference_parse_non_numeric_fragment_ignored() {
        let r = Reference::parse("arch.drawio#intro");
        assert_eq!(r.path, "arch.drawio");
        assert_eq!(r.page, None);
    }

    #[test]
    fn test_normalize_parent_segments() {
        assert_eq!(
            normalize(Path::new("/site/guide/../assets/./a.drawio")),
            PathBuf::from("/site/assets/a.drawio")
        );
    }

    #[test]
    fn test_normalize_clamps_at_root() {
        assert_eq!(
            normalize(Path::new("/site/../../a.drawio")),
            PathBuf::from("/a.drawio")
        );
    }

    #[test]
    fn test_resolve_external_passthrough() {
        let ctx = PageContext::new("/site/p.html", "/site/p.html", "/site");
        let resolved = resolve("https://example.com/a.drawio", &ctx, false).unwrap();
        assert_eq!(resolved, ResolvedRef::External);
        let resolved = resolve("//cdn.example.com/a.drawio", &ctx, false).unwrap();
        assert_eq!(resolved, ResolvedRef::External);
    }

    #[test]
    fn test_resolve_missing_file() {
        let ctx = PageContext::new("/nonexistent/p.html", "/nonexistent/p.html", "/nonexistent");
        let err = resolve("a.drawio", &ctx, false).unwrap_err();
        assert!(matches!(err, EmbedError::PathNotFound { reference } if reference == "a.drawio"));
    }

    #[test]
    fn test_resolve_relative_to_page_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let guide = tmp.path().join("guide");
        std::fs::create_dir_all(&guide).unwrap();
        std::fs::write(tmp.path().join("arch.drawio"), "<mxfile/>").unwrap();

        let page = guide.join("index.html");
        let ctx = PageContext::new(&page, &page, tmp.path());
        let resolved = resolve("../arch.drawio", &ctx, false).unwrap();
        assert_eq!(
            resolved,
            ResolvedRef::Local(normalize(&tmp.path().join("arch.drawio")))
        );
    }

    #[test]
    fn test_resolve_site_absolute() {
        let tmp = tempfile::tempdir().unwrap();
        let assets = tmp.path().join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("a.drawio"), "<mxfile/>").unwrap();

        let page = tmp.path().join("deep/page.html");
        let ctx = PageContext::new(&page, &page, tmp.path());
        let resolved = resolve("/assets/a.drawio", &ctx, false).unwrap();
        assert!(matches!(resolved, ResolvedRef::Local(_)));
    }

    #[test]
    fn test_resolve_enforce_site_root() {
        let tmp = tempfile::tempdir().unwrap();
        let site = tmp.path().join("site");
        std::fs::create_dir_all(&site).unwrap();
        std::fs::write(tmp.path().join("outside.drawio"), "<mxfile/>").unwrap();

        let page = site.join("p.html");
        let ctx = PageContext::new(&page, &page, &site);

        // Trusted by default.
        assert!(matches!(
            resolve("../outside.drawio", &ctx, false).unwrap(),
            ResolvedRef::Local(_)
        ));
        // Rejected when containment is enforced.
        let err = resolve("../outside.drawio", &ctx, true).unwrap_err();
        assert!(matches!(err, EmbedError::OutsideSiteRoot { .. }));
    }
}
