//! Error types for Captionist.
//!
//! Caption failures are grouped by where they happen: reading the image,
//! the provider rejecting the request, or the transport failing underneath.
//! A success response whose JSON lacks the caption field is not an error;
//! adapters fall back to a fixed caption instead. A success body that is not
//! JSON at all is reported as [`CaptionError::Decode`].

use thiserror::Error;

/// Errors surfaced by caption generation.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The source image could not be read or encoded
    #[error("Failed to read image: {message}")]
    Read { message: String },

    /// The provider answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Transport-level failure (DNS, connect, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// A success response whose body could not be decoded as JSON
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CaptionError {
    pub(crate) fn read(message: impl Into<String>) -> Self {
        Self::Read {
            message: message.into(),
        }
    }

    /// HTTP status of the provider response, if the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for caption results.
pub type Result<T> = std::result::Result<T, CaptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_displays_provider_message() {
        let err = CaptionError::Http {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.to_string(), "Incorrect API key provided");
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_read_error_has_no_status() {
        let err = CaptionError::read("file is empty");
        assert!(err.to_string().contains("file is empty"));
        assert_eq!(err.status_code(), None);
    }
}
