use serde::Deserialize;

/// Tuning configuration for Kagami
///
/// The seed URL and output root are command-line arguments, not part of
/// this file; everything here has a sensible default and may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub workers: WorkerConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Overall request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Connection establishment timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("kagami/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

/// Bounds for the two fan-out tiers
///
/// Pages fan out once per known link per round; images fan out once per
/// reference within a page. Each tier is capped by its own semaphore so
/// a page with thousands of references cannot spawn thousands of
/// concurrent network operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Maximum concurrent page fetches per round
    #[serde(rename = "page-workers")]
    pub page_workers: usize,

    /// Maximum concurrent asset fetches across all pages
    #[serde(rename = "asset-workers")]
    pub asset_workers: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            page_workers: 16,
            asset_workers: 8,
        }
    }
}
