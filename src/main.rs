//! Kagami main entry point
//!
//! Command-line interface for the Kagami website mirrorer.

use anyhow::Context;
use clap::Parser;
use kagami::config::{load_config, Config};
use kagami::crawler::CrawlScheduler;
use kagami::KagamiError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Kagami: mirror a website onto local disk
///
/// Starting from SEED, Kagami follows anchor links breadth-first,
/// downloads each page's HTML plus its stylesheets, scripts, and
/// images, and reproduces the site's URL-path hierarchy under OUTPUT.
#[derive(Parser, Debug)]
#[command(name = "kagami")]
#[command(version)]
#[command(about = "Mirror a website onto local disk", long_about = None)]
struct Cli {
    /// Absolute seed URL to start mirroring from
    #[arg(value_name = "SEED")]
    seed: Url,

    /// Output root directory for the mirror tree
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Path to an optional TOML tuning file (worker pools, timeouts)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    tracing::info!(
        "Mirroring {} into {} ({} page workers, {} asset workers)",
        cli.seed,
        cli.output.display(),
        config.workers.page_workers,
        config.workers.asset_workers
    );

    let scheduler = CrawlScheduler::new(&config, cli.output.clone())
        .context("failed to initialize crawler")?;

    let quiet = cli.quiet;
    let result = scheduler
        .run_with_progress(&cli.seed, |stats| {
            if !quiet {
                let visited = stats.known - stats.unvisited;
                println!(
                    "round {}: {} links known, {} visited, {} unvisited",
                    stats.round, stats.known, visited, stats.unvisited
                );
            }
        })
        .await;

    match result {
        Ok(report) => {
            println!(
                "Mirror complete: {} pages in {} rounds, written to {}",
                report.pages_visited,
                report.round_count(),
                cli.output.display()
            );
            Ok(())
        }
        Err(e) => {
            if let KagamiError::Fetch(fetch_err) = &e {
                if fetch_err.is_transient() {
                    eprintln!("Crawl aborted on a transient failure; re-running may succeed.");
                }
            }
            eprintln!("Crawl aborted; files written so far remain in {}", cli.output.display());
            Err(e.into())
        }
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kagami=info,warn"),
            1 => EnvFilter::new("kagami=debug,info"),
            2 => EnvFilter::new("kagami=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
