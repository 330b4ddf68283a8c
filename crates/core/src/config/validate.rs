use url::Url;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Service URLs are absolute http(s) URLs
/// - Poller budget and progress bounds
/// - OCR confidence threshold range
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    for (key, value) in [
        ("services.storage_url", &config.services.storage_url),
        ("services.etl_url", &config.services.etl_url),
        ("services.ocr_url", &config.services.ocr_url),
    ] {
        validate_service_url(key, value)?;
    }

    if config.poller.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "poller.max_attempts must be at least 1".to_string(),
        ));
    }

    if config.poller.progress_base >= 100 {
        return Err(ConfigError::ValidationError(
            "poller.progress_base must be below 100".to_string(),
        ));
    }

    let threshold = config.ocr.default_confidence_threshold;
    if !(0.0..=100.0).contains(&threshold) {
        return Err(ConfigError::ValidationError(format!(
            "ocr.default_confidence_threshold must be within 0-100, got {}",
            threshold
        )));
    }

    Ok(())
}

fn validate_service_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::ValidationError(format!("{} is not a valid URL: {}", key, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError(format!(
            "{} must use http or https, got {}",
            key, other
        ))),
    }
}
