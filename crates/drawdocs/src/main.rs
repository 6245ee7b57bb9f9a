//! drawdocs CLI - draw.io diagram embedding for documentation sites.
//!
//! Provides commands for:
//! - `process`: Embed diagram references in a rendered site
//! - `assets`: Install the client-side viewer script

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AssetsArgs, ProcessArgs};
use output::Output;

/// drawdocs - Diagram embedding post-processor.
#[derive(Parser)]
#[command(name = "drawdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed diagram references in a rendered site.
    Process(ProcessArgs),
    /// Install the client-side viewer script into the site.
    Assets(AssetsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Process(args) => args.verbose,
        Commands::Assets(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Assets(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
