use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[request]
timeout-seconds = 20
user-agent = "TestGauge/1.0"

[sitemap]
max-pages = 25

[thresholds]
title-min-length = 15
title-max-length = 65

[weights]
high = 12
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.request.timeout_seconds, 20);
        assert_eq!(config.request.user_agent, "TestGauge/1.0");
        assert_eq!(config.sitemap.max_pages, Some(25));
        assert_eq!(config.thresholds.title_min_length, 15);
        assert_eq!(config.weights.high, 12);
        // Untouched keys keep their defaults
        assert_eq!(config.weights.medium, 5);
        assert_eq!(config.thresholds.min_word_count, 300);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.request.timeout_seconds, 10);
        assert_eq!(config.weights.low, 0);
        assert!(config.sitemap.max_pages.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[request]
timeout-seconds = 0
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
