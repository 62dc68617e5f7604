use crate::config::types::{BatchConfig, Config, FetchConfig, OutputConfig, SourcesConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_sources_config(&config.sources)?;
    validate_batch_config(&config.batch)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    for name in config.headers.keys() {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ConfigError::Validation(format!(
                "Invalid header name '{}'",
                name
            )));
        }
    }

    Ok(())
}

/// Validates upstream endpoints
fn validate_sources_config(config: &SourcesConfig) -> Result<(), ConfigError> {
    validate_http_url("schedule-url", &config.schedule_url)?;
    validate_http_url("shnaton-url", &config.shnaton_url)?;

    for placeholder in ["{course}", "{year}"] {
        if !config.syllabus_url.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "syllabus-url must contain the {} placeholder, got '{}'",
                placeholder, config.syllabus_url
            )));
        }
    }

    // The template itself is not a URL; check an expanded sample instead
    let sample = config
        .syllabus_url
        .replace("{course}", "0")
        .replace("{year}", "2000");
    validate_http_url("syllabus-url", &sample)?;

    Ok(())
}

/// Validates batch scheduling configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_courses < 1 || config.max_concurrent_courses > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-courses must be between 1 and 100, got {}",
            config.max_concurrent_courses
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    Ok(())
}
