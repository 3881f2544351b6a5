//! Crawler module for page fetching and mirroring
//!
//! This module contains the core crawl engine:
//! - HTTP fetching with error classification
//! - HTML parsing and link extraction
//! - Asset localization into the mirror tree
//! - The round-based crawl scheduler

mod assets;
mod fetcher;
mod parser;
mod scheduler;

pub use assets::{AssetKind, AssetLocalizer, PageProcessor};
pub use fetcher::{build_http_client, fetch};
pub use parser::{extract_new_links, parse_page, ParsedPage};
pub use scheduler::{CrawlReport, CrawlScheduler, RoundStats};

use crate::config::Config;
use crate::KagamiError;
use std::path::PathBuf;
use url::Url;

/// Mirrors a website into `root`, starting from `seed`.
///
/// Convenience entry point wrapping [`CrawlScheduler`].
///
/// # Example
///
/// ```no_run
/// use kagami::config::Config;
/// use kagami::crawler::mirror;
/// use std::path::PathBuf;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = Url::parse("http://books.toscrape.com/")?;
/// let report = mirror(&Config::default(), &seed, PathBuf::from("books")).await?;
/// println!("visited {} pages", report.pages_visited);
/// # Ok(())
/// # }
/// ```
pub async fn mirror(
    config: &Config,
    seed: &Url,
    root: PathBuf,
) -> Result<CrawlReport, KagamiError> {
    let scheduler = CrawlScheduler::new(config, root)?;
    scheduler.run(seed).await
}
