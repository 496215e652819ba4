//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::Config;
use std::path::Path;

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "clockmap.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges that serde cannot express.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    config.timing.validate()?;

    let classify = &config.classify;
    for (field, patterns) in [
        ("clock_patterns", &classify.clock_patterns),
        ("reset_patterns", &classify.reset_patterns),
    ] {
        if patterns.iter().any(|p| p.as_str().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "classify.{field} must not contain empty patterns"
            )));
        }
    }

    if config.design.extensions.is_empty() {
        return Err(ConfigError::MissingField("design.extensions".to_string()));
    }

    let formal = &config.formal;
    if formal.read_marker.trim().is_empty() || formal.files_marker.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "formal section markers must not be empty".to_string(),
        ));
    }

    config.clock_periods()?;
    Ok(())
}
