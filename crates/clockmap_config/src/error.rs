//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `clockmap.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("design.top".to_string());
        assert_eq!(err.to_string(), "missing required field: design.top");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("timing.period must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: timing.period must be positive"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::from(io_err);
        assert!(err.to_string().starts_with("failed to read configuration:"));
    }
}
