//! Kagami: a concurrent website mirrorer
//!
//! Starting from a seed URL, Kagami discovers reachable pages by following
//! anchor links, downloads each page's HTML plus its referenced stylesheets,
//! scripts, and images, and reproduces the site's URL-path hierarchy as a
//! directory tree under a local output root.

pub mod config;
pub mod crawler;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Kagami operations
#[derive(Debug, Error)]
pub enum KagamiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("Worker pool unavailable: {0}")]
    Pool(#[from] tokio::sync::AcquireError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),
}

/// A failed network fetch.
///
/// This is the only failure kind workers can observe from the network
/// layer. `Status` is an HTTP-level error for a given URL; `Network`
/// covers transport failures (timeout, connection refused, TLS). The
/// split lets callers tell a retryable failure from a dead resource,
/// even though the default crawl policy never retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} when fetching {url}")]
    Status { url: String, status: u16 },

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Returns the URL the fetch was for.
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } => url,
            Self::Network { url, .. } => url,
        }
    }

    /// Returns true if a retry could plausibly succeed.
    ///
    /// Transport failures and server-side statuses (429, 5xx) are
    /// transient; client-side statuses like 404 are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Kagami operations
pub type Result<T> = std::result::Result<T, KagamiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawlScheduler, RoundStats};
pub use state::{LinkRegistry, LinkState};
