//! `drawdocs assets` command implementation.
//!
//! Installs the client-side viewer script into the rendered site so embedded
//! diagrams work offline. When the download fails, a small loader stub that
//! pulls the script from the configured URL at view time is written instead,
//! keeping the built site functional for online readers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use drawdocs_config::{CliSettings, Config};
use ureq::Agent;

use crate::error::CliError;
use crate::output::Output;

/// Viewer script location inside the site, relative to the site directory.
const VIEWER_DEST: &str = "assets/drawio/viewer.min.js";

/// Download timeout for the viewer script.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Arguments for the assets command.
#[derive(Args)]
pub(crate) struct AssetsArgs {
    /// Rendered site directory to install into (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Viewer script URL or local path (overrides config).
    #[arg(long)]
    url: Option<String>,

    /// Path to configuration file (default: auto-discover drawdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl AssetsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir.clone(),
            viewer_url: self.url.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site_dir = &config.build_resolved.site_dir;
        if !site_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "site directory does not exist: {}",
                site_dir.display()
            )));
        }

        let dest = site_dir.join(VIEWER_DEST);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if config.viewer.is_local() {
            let source = resolve_local_source(&config);
            std::fs::copy(&source, &dest).map_err(|e| {
                CliError::Validation(format!(
                    "cannot copy viewer script from {}: {e}",
                    source.display()
                ))
            })?;
            output.success(&format!("Viewer script copied to {}", dest.display()));
            return Ok(());
        }

        match download(&config.viewer.url) {
            Ok(script) => {
                std::fs::write(&dest, script)?;
                output.success(&format!("Viewer script installed to {}", dest.display()));
            }
            Err(err) => {
                tracing::warn!(url = %config.viewer.url, %err, "viewer download failed");
                std::fs::write(&dest, loader_stub(&config.viewer.url))?;
                output.warning(&format!(
                    "Viewer download failed ({err}); wrote loader stub to {}",
                    dest.display()
                ));
            }
        }
        Ok(())
    }
}

/// Resolve a local viewer source relative to the config file location.
fn resolve_local_source(config: &Config) -> PathBuf {
    let base = config
        .config_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    base.join(&config.viewer.url)
}

/// Create HTTP agent with the download timeout.
fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Fetch the viewer script body.
fn download(url: &str) -> Result<String, CliError> {
    let agent = create_agent(DOWNLOAD_TIMEOUT);
    let response = agent
        .get(url)
        .call()
        .map_err(|e| CliError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    let mut body = response.into_body();
    if status >= 400 {
        return Err(CliError::Http(format!("HTTP {status} from {url}")));
    }
    body.read_to_string()
        .map_err(|e| CliError::Http(e.to_string()))
}

/// Build the fallback stub that loads the viewer from its URL at view time.
fn loader_stub(url: &str) -> String {
    format!(
        "(function () {{\n  var s = document.createElement(\"script\");\n  s.src = \"{url}\";\n  document.head.appendChild(s);\n}})();\n"
    )
}
