//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.request_timeout_ms must be > 0".into(),
            ));
        }
        check_url("providers.openai.endpoint", &self.providers.openai.endpoint)?;
        check_url("providers.gemini.endpoint", &self.providers.gemini.endpoint)?;
        if self.providers.openai.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.openai.model must not be empty".into(),
            ));
        }
        if self.providers.gemini.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.gemini.model must not be empty".into(),
            ));
        }
        Ok(())
    }
}
