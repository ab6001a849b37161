use crate::config::types::{Config, RequestConfig, Thresholds};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network call; a misconfigured analyzer fails fast with
/// a `ConfigError::Validation` rather than producing a skewed report.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_request_config(&config.request)?;
    validate_thresholds(&config.thresholds)?;
    Ok(())
}

/// Validates HTTP request configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    match config.http_version.as_str() {
        "auto" | "1.1" | "2" => {}
        other => {
            return Err(ConfigError::Validation(format!(
                "http-version must be one of auto, 1.1, 2; got '{}'",
                other
            )))
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for proxy in config.proxy_list() {
        Url::parse(proxy).map_err(|e| {
            ConfigError::InvalidProxy(format!("{}: {}", proxy, e))
        })?;
    }

    Ok(())
}

/// Validates rule thresholds
fn validate_thresholds(thresholds: &Thresholds) -> Result<(), ConfigError> {
    if thresholds.title_min_length > thresholds.title_max_length {
        return Err(ConfigError::Validation(format!(
            "title-min-length ({}) must not exceed title-max-length ({})",
            thresholds.title_min_length, thresholds.title_max_length
        )));
    }

    if thresholds.description_min_length > thresholds.description_max_length {
        return Err(ConfigError::Validation(format!(
            "description-min-length ({}) must not exceed description-max-length ({})",
            thresholds.description_min_length, thresholds.description_max_length
        )));
    }

    if thresholds.max_load_time <= 0.0 {
        return Err(ConfigError::Validation(
            "max-load-time must be positive".to_string(),
        ));
    }

    if thresholds.max_ttfb <= 0.0 {
        return Err(ConfigError::Validation(
            "max-ttfb must be positive".to_string(),
        ));
    }

    if !(0.0..=100.0).contains(&thresholds.min_text_ratio) {
        return Err(ConfigError::Validation(format!(
            "min-text-ratio must be between 0 and 100, got {}",
            thresholds.min_text_ratio
        )));
    }

    if thresholds.modern_image_formats.is_empty() {
        return Err(ConfigError::Validation(
            "modern-image-formats cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.request.timeout_seconds = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_unknown_http_version_rejected() {
        let mut config = Config::default();
        config.request.http_version = "3".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent_rejected() {
        let mut config = Config::default();
        config.request.user_agent = "  ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let mut config = Config::default();
        config.request.proxies = "http://ok.example:8080\nnot a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidProxy(_)
        ));
    }

    #[test]
    fn test_valid_proxies_accepted() {
        let mut config = Config::default();
        config.request.proxies = "http://a.example:8080\n\nsocks5://b.example:1080\n".to_string();
        assert!(validate(&config).is_ok());
        assert_eq!(config.request.proxy_list().len(), 2);
    }

    #[test]
    fn test_inverted_title_bounds_rejected() {
        let mut config = Config::default();
        config.thresholds.title_min_length = 80;
        config.thresholds.title_max_length = 70;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_text_ratio_out_of_range_rejected() {
        let mut config = Config::default();
        config.thresholds.min_text_ratio = 120.0;
        assert!(validate(&config).is_err());
    }
}
