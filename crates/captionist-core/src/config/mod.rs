//! Configuration management for Captionist.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::llm::Provider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Captionist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Default caption options
    pub caption: CaptionConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Provider endpoints, models, and keys
    pub providers: ProvidersConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.captionist.captionist/config.toml
    /// - Linux: ~/.config/captionist/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\captionist\config\config.toml
    ///
    /// Falls back to ~/.captionist/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "captionist", "captionist")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".captionist").join("config.toml")
            })
    }

    /// Get the resolved key store path (with ~ expansion).
    pub fn key_store_path(&self) -> PathBuf {
        let path_str = self.general.key_store.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// API key configured for `provider`, after `${ENV_VAR}` resolution.
    pub fn api_key_for(&self, provider: Provider) -> Option<String> {
        let raw = match provider {
            Provider::OpenAi => &self.providers.openai.api_key,
            Provider::Google => &self.providers.gemini.api_key,
        };
        resolve_env_var(raw)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Platform, Tone};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.request_timeout_ms, 60_000);
        assert_eq!(config.providers.openai.model, "gpt-4o-mini");
        assert_eq!(config.providers.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.caption.tone, Tone::Creative);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[caption]"));
        assert!(toml.contains("[providers.openai]"));
        assert!(toml.contains("tone = \"creative\""));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [caption]
            platform = "linkedin"

            [providers.gemini]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.caption.platform, Platform::Linkedin);
        assert_eq!(config.caption.tone, Tone::Creative);
        assert_eq!(config.providers.gemini.model, "gemini-1.5-pro");
        assert!(config.providers.gemini.endpoint.starts_with("https://"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = Config::from_toml("[limits]\nrequest_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_tone_is_parse_error() {
        let err = Config::from_toml("[caption]\ntone = \"grumpy\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[limits]\nmax_file_size_mb = 5\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.limits.max_file_size_mb, 5);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_api_key_for_literal_value() {
        let mut config = Config::default();
        config.providers.gemini.api_key = "AIza-literal".to_string();
        assert_eq!(
            config.api_key_for(Provider::Google),
            Some("AIza-literal".to_string())
        );
    }
}
