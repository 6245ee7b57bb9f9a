//! Configuration management for drawdocs.
//!
//! Parses `drawdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "drawdocs.toml";

/// Default viewer script served by diagrams.net.
pub const DEFAULT_VIEWER_URL: &str = "https://viewer.diagrams.net/js/viewer-static.min.js";

/// Upper bound for the border option, in pixels.
const MAX_BORDER: u32 = 500;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the rendered site directory.
    pub site_dir: Option<PathBuf>,
    /// Override strict mode.
    pub strict: Option<bool>,
    /// Override site-root containment enforcement.
    pub enforce_site_root: Option<bool>,
    /// Override the viewer script URL.
    pub viewer_url: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plugin-wide embed option defaults.
    pub embed: EmbedConfig,
    /// Build behavior (paths are relative strings from TOML).
    #[serde(default)]
    build: BuildConfigRaw,
    /// Viewer asset configuration.
    pub viewer: ViewerConfig,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Plugin-wide embed option defaults, applied where neither a page override
/// nor an inline marker attribute sets the option.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Show the hover toolbar.
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

impl Default for EmbedConfig {
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

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    site_dir: Option<String>,
    strict: Option<bool>,
    enforce_site_root: Option<bool>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory holding the rendered site to post-process.
    pub site_dir: PathBuf,
    /// Abort the build on the first failed marker.
    pub strict: bool,
    /// Reject diagram files resolving outside the site directory.
    pub enforce_site_root: bool,
}

/// Viewer asset configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// URL of the viewer script to download, or a local path to copy.
    pub url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_VIEWER_URL.to_owned(),
        }
    }
}

impl ViewerConfig {
    /// Check whether the configured source is a local file rather than a URL.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !self.url.starts_with("http://") && !self.url.starts_with("https://")
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `drawdocs.toml` in current directory and
    /// parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing
    /// fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_dir) = &settings.site_dir {
            self.build_resolved.site_dir.clone_from(site_dir);
        }
        if let Some(strict) = settings.strict {
            self.build_resolved.strict = strict;
        }
        if let Some(enforce) = settings.enforce_site_root {
            self.build_resolved.enforce_site_root = enforce;
        }
        if let Some(viewer_url) = &settings.viewer_url {
            self.viewer.url.clone_from(viewer_url);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            embed: EmbedConfig::default(),
            build: BuildConfigRaw::default(),
            viewer: ViewerConfig::default(),
            build_resolved: BuildConfig {
                site_dir: base.join("site"),
                strict: false,
                enforce_site_root: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all fields contain valid values. Called automatically
    /// after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embed.border > MAX_BORDER {
            return Err(ConfigError::Validation(format!(
                "embed.border cannot exceed {MAX_BORDER}"
            )));
        }
        require_non_empty(&self.viewer.url, "viewer.url")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let site_dir = self.build.site_dir.as_deref().unwrap_or("site");
        self.build_resolved = BuildConfig {
            site_dir: config_dir.join(site_dir),
            strict: self.build.strict.unwrap_or(false),
            enforce_site_root: self.build.enforce_site_root.unwrap_or(false),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(!config.embed.toolbar);
        assert!(!config.embed.tooltips);
        assert!(!config.embed.edit);
        assert_eq!(config.embed.border, 0);
        assert!(config.embed.resize);
        assert_eq!(config.build_resolved.site_dir, PathBuf::from("/test/site"));
        assert!(!config.build_resolved.strict);
        assert!(!config.build_resolved.enforce_site_root);
        assert_eq!(config.viewer.url, DEFAULT_VIEWER_URL);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.embed.toolbar);
        assert!(config.embed.resize);
        assert_eq!(config.viewer.url, DEFAULT_VIEWER_URL);
    }

    #[test]
    fn test_parse_embed_config() {
        let toml = r#"
[embed]
toolbar = true
border = 8
resize = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.embed.toolbar);
        assert_eq!(config.embed.border, 8);
        assert!(!config.embed.resize);
        // Unspecified options keep their defaults.
        assert!(!config.embed.tooltips);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[build]
site_dir = "public"
strict = true
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.site_dir,
            PathBuf::from("/project/public")
        );
        assert!(config.build_resolved.strict);
        assert!(!config.build_resolved.enforce_site_root);
    }

    #[test]
    fn test_apply_cli_settings_site_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            site_dir: Some(PathBuf::from("/custom/site")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.build_resolved.site_dir,
            PathBuf::from("/custom/site")
        );
        assert!(!config.build_resolved.strict); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            strict: Some(true),
            enforce_site_root: Some(true),
            viewer_url: Some("https://cdn.example.com/viewer.js".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.build_resolved.strict);
        assert!(config.build_resolved.enforce_site_root);
        assert_eq!(config.viewer.url, "https://cdn.example.com/viewer.js");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(
            config.build_resolved.site_dir,
            before.build_resolved.site_dir
        );
        assert_eq!(config.viewer.url, before.viewer.url);
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_border_too_large() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.embed.border = 10_000;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("embed.border"));
    }

    #[test]
    fn test_validate_viewer_url_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.viewer.url = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("viewer.url"));
    }

    #[test]
    fn test_viewer_is_local() {
        let mut viewer = ViewerConfig::default();
        assert!(!viewer.is_local());
        viewer.url = "assets/viewer.js".to_owned();
        assert!(viewer.is_local());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/definitely/missing.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[build]
site_dir = "out"

[embed]
toolbar = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.build_resolved.site_dir, tmp.path().join("out"));
        assert!(config.embed.toolbar);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_over_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[build]\nstrict = false\n").unwrap();

        let settings = CliSettings {
            strict: Some(true),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(config.build_resolved.strict);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[embed]\nborder = 9999\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
