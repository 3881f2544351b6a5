use crate::config::types::{Config, HttpConfig, WorkerConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_worker_config(&config.workers)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_ms < 1000 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 1000ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    if config.connect_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-ms must be >= 100ms, got {}ms",
            config.connect_timeout_ms
        )));
    }

    Ok(())
}

/// Validates worker pool bounds
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.page_workers < 1 || config.page_workers > 256 {
        return Err(ConfigError::Validation(format!(
            "page-workers must be between 1 and 256, got {}",
            config.page_workers
        )));
    }

    if config.asset_workers < 1 || config.asset_workers > 256 {
        return Err(ConfigError::Validation(format!(
            "asset-workers must be between 1 and 256, got {}",
            config.asset_workers
        )));
    }

    Ok(())
}
