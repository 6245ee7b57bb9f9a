//! Embed option merging.
//!
//! Three layers, highest precedence first: per-marker inline attributes,
//! page-scoped overrides, plugin-wide defaults. The merge is a pure
//! field-by-field fold; page-index range checking happens later at fragment
//! synthesis, never here.

/// Plugin-wide default embed options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedDefaults {
    /// Show the hover toolbar (pan/zoom affordances).
    pub toolbar: bool,
    /// Show tooltips on diagram elements.
    pub tooltips: bool,
    /// Offer an edit affordance.
    pub edit: bool,
    /// Border padding around the diagram, in pixels.
    pub border: u32,
    /// Let the viewer resize the diagram to its container.
    pub resize: bool,
}

impl Default for EmbedDefaults {
    fn default() -> Self {
        Self {
            toolbar: false,
            tooltips: false,
            edit: false,
            border: 0,
            resize: true,
        }
    }
}

/// Partial embed options for one scope (page or marker).
///
/// `None` means "not specified here, fall through to the next layer".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedOverrides {
    pub toolbar: Option<bool>,
    pub tooltips: Option<bool>,
    pub edit: Option<bool>,
    pub border: Option<u32>,
    pub resize: Option<bool>,
    /// Zero-based page selection within the diagram file.
    pub page: Option<usize>,
}

/// Attribute names recognized as inline embed options.
const OPTION_ATTRS: &[&str] = &["toolbar", "tooltips", "edit", "border", "page", "resize"];

impl EmbedOverrides {
    /// Parse inline options from a marker's attributes.
    ///
    /// Unknown attributes are ignored (forward-compatible authoring);
    /// unparsable values for recognized options are ignored with a warning.
    /// A bare boolean attribute (`toolbar` with no value) means `true`.
    pub fn from_marker_attrs<'a>(attrs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
        let mut overrides = Self::default();
        for (name, value) in attrs {
            let Some(option) = OPTION_ATTRS
                .iter()
                .find(|o| name.eq_ignore_ascii_case(o))
            else {
                continue;
            };
            match *option {
                "toolbar" => overrides.toolbar = parse_bool(name, value),
                "tooltips" => overrides.tooltips = parse_bool(name, value),
                "edit" => overrides.edit = parse_bool(name, value),
                "resize" => overrides.resize = parse_bool(name, value),
                "border" => overrides.border = parse_int(name, value),
                "page" => overrides.page = parse_int(name, value),
                _ => unreachable!("OPTION_ATTRS is exhaustive"),
            }
        }
        overrides
    }

    /// Check whether any option is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_bool(name: &str, value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        other => {
            tracing::warn!(option = name, value = other, "ignoring unparsable boolean option");
            None
        }
    }
}

fn parse_int<T: std::str::FromStr>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(option = name, value, "ignoring unparsable integer option");
            None
        }
    }
}

/// Fully resolved options for one marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub toolbar: bool,
    pub tooltips: bool,
    pub edit: bool,
    pub border: u32,
    pub resize: bool,
    /// Selected page, defaulting to 0. Validated against the loaded
    /// document at fragment synthesis.
    pub page_index: usize,
}

/// Merge option layers into an effective configuration.
#[must_use]
pub fn merge(
    defaults: &EmbedDefaults,
    page: &EmbedOverrides,
    inline: &EmbedOverrides,
) -> EffectiveConfig {
    EffectiveConfig {
        toolbar: inline.toolbar.or(page.toolbar).unwrap_or(defaults.toolbar),
        tooltips: inline
            .tooltips
            .or(page.tooltips)
            .unwrap_or(defaults.tooltips),
        edit: inline.edit.or(page.edit).unwrap_or(defaults.edit),
        border: inline.border.or(page.border).unwrap_or(defaults.border),
        resize: inline.resize.or(page.resize).unwrap_or(defaults.resize),
        page_index: inline.page.or(page.page).unwrap_or(0),
    }
}
