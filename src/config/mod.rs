//! Configuration module for Kagami
//!
//! The seed URL and output root are given on the command line; this
//! module handles the optional TOML tuning file (HTTP client settings
//! and worker pool bounds) and its validation.
//!
//! # Example
//!
//! ```no_run
//! use kagami::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kagami.toml")).unwrap();
//! println!("page workers: {}", config.workers.page_workers);
//! ```

mod types;
mod validation;

pub use types::{Config, HttpConfig, WorkerConfig};
pub use validation::validate;

use crate::ConfigResult;
use std::path::Path;

/// Loads and validates a TOML configuration file
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [http]
            user-agent = "test-mirror/0.1"
            request-timeout-ms = 5000
            connect-timeout-ms = 2000

            [workers]
            page-workers = 4
            asset-workers = 2
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.http.user_agent, "test-mirror/0.1");
        assert_eq!(config.http.request_timeout_ms, 5000);
        assert_eq!(config.workers.page_workers, 4);
        assert_eq!(config.workers.asset_workers, 2);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [workers]
            page-workers = 3
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.workers.page_workers, 3);
        assert_eq!(config.workers.asset_workers, WorkerConfig::default().asset_workers);
        assert_eq!(config.http.request_timeout_ms, HttpConfig::default().request_timeout_ms);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [workers]
            page-workers = 0
            "#
        )
        .unwrap();

        assert!(load_config(file.path()).is_err());
    }
}
