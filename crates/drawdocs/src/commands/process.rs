//! `drawdocs process` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use drawdocs_config::{CliSettings, Config};
use drawdocs_embed::{EmbedDefaults, PageContext, Rewriter};
use rayon::prelude::*;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Rendered site directory to post-process (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Abort on the first failed diagram marker.
    #[arg(long)]
    strict: bool,

    /// Reject diagram files resolving outside the site directory.
    #[arg(long)]
    enforce_site_root: bool,

    /// Path to configuration file (default: auto-discover drawdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ProcessArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            site_dir: self.site_dir.clone(),
            strict: self.strict.then_some(true),
            enforce_site_root: self.enforce_site_root.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site_dir = config.build_resolved.site_dir.clone();
        if !site_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "site directory does not exist: {}",
                site_dir.display()
            )));
        }

        output.info(&format!("Site: {}", site_dir.display()));

        let rewriter = Rewriter::new()
            .with_defaults(embed_defaults(&config))
            .strict(config.build_resolved.strict)
            .enforce_site_root(config.build_resolved.enforce_site_root);

        let pages = collect_pages(&site_dir)?;

        let results: Vec<Result<bool, CliError>> = pages
            .par_iter()
            .map(|page| process_page(&rewriter, page, &site_dir))
            .collect();

        let mut changed = 0usize;
        for result in results {
            if result? {
                changed += 1;
            }
        }

        output.success(&format!(
            "Processed {} page(s), embedded diagrams in {changed}",
            pages.len()
        ));
        Ok(())
    }
}

/// Map config embed defaults into the rewriter's option type.
fn embed_defaults(config: &Config) -> EmbedDefaults {
    EmbedDefaults {
        toolbar: config.embed.toolbar,
        tooltips: config.embed.tooltips,
        edit: config.embed.edit,
        border: config.embed.border,
        resize: config.embed.resize,
    }
}

/// Collect every rendered HTML page under the site directory.
fn collect_pages(site_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = format!("{}/**/*.html", site_dir.display());
    let mut pages = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

/// Transform one page in place. Returns whether the file changed.
fn process_page(rewriter: &Rewriter, page: &Path, site_root: &Path) -> Result<bool, CliError> {
    let html = std::fs::read_to_string(page)?;
    let ctx = PageContext::new(page, page, site_root);
    let transformed = rewriter.transform(&html, &ctx)?;

    if transformed == html {
        return Ok(false);
    }
    std::fs::write(page, transformed)?;
    tracing::info!(page = %page.display(), "page updated");
    Ok(true)
}
