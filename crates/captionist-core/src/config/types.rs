//! Sub-configuration structs with their defaults.

use crate::options::{CaptionOptions, Length, Platform, Tone};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// File holding the saved API key and provider
    pub key_store: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            key_store: PathBuf::from("~/.captionist/credentials.toml"),
        }
    }
}

/// Default caption options applied when a request leaves a field unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub tone: Tone,
    pub length: Length,
    pub include_hashtags: bool,
    pub platform: Platform,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            tone: Tone::Creative,
            length: Length::Medium,
            include_hashtags: true,
            platform: Platform::General,
        }
    }
}

impl CaptionConfig {
    /// These defaults as fully specified caption options.
    pub fn to_options(&self) -> CaptionOptions {
        CaptionOptions::new(self.tone, self.length, self.include_hashtags, self.platform)
    }
}

/// Resource limits for outbound requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest image accepted for upload, in megabytes
    pub max_file_size_mb: u64,

    /// Provider request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
            request_timeout_ms: 60_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Provider endpoint configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    /// OpenAI Chat Completions
    pub openai: OpenAiConfig,

    /// Google Gemini generateContent
    pub gemini: GeminiConfig,
}

/// OpenAI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Full chat-completions URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
        }
    }
}

/// Gemini configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API base URL; `/models/{model}:generateContent` is appended
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: "${GEMINI_API_KEY}".to_string(),
        }
    }
}
