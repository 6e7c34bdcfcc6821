//! Configuration validation logic
//!
//! Loaded settings are checked for well-formedness only. An endpoint that is
//! merely incomplete (no token yet, say) is not an error here: the client
//! resolves it into a disabled state instead.

use url::Url;

use crate::config::error::ConfigError;
use crate::config::settings::{ClientOptions, FileSettings, LoggerSettings, Settings};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ClientOptions {
    /// Validate client options
    ///
    /// # Validation Rules
    /// - `url`, when set and non-empty, must parse as an absolute URL
    /// - `protocol`, when set, must be `http` or `https`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            Url::parse(url).map_err(|e| ConfigError::ValidationError {
                field: "client.url".to_string(),
                message: format!("Invalid endpoint URL '{}': {}", url, e),
            })?;
        }

        if let Some(protocol) = self.protocol.as_deref()
            && !matches!(protocol.to_lowercase().as_str(), "http" | "https")
        {
            return Err(ConfigError::ValidationError {
                field: "client.protocol".to_string(),
                message: format!("Unsupported protocol '{}'. Expected http or https.", protocol),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all settings, returning the first error encountered
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
