//! Provider capability, credentials, and the closed set of adapters.
//!
//! Each adapter owns its provider's wire format: endpoint shape, request
//! envelope, where the key goes, and how a caption is pulled out of the
//! response. [`ProviderAdapter`] picks one from a [`Provider`] tag.

use super::gemini::GeminiAdapter;
use super::openai::OpenAiAdapter;
use crate::config::{LimitsConfig, ProvidersConfig};
use crate::error::{CaptionError, Result};
use crate::image::EncodedImage;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Caption returned when a success response lacks the expected field.
pub const FALLBACK_CAPTION: &str = "Unable to generate caption.";

/// Output token ceiling sent to both providers.
pub const MAX_OUTPUT_TOKENS: u32 = 300;

/// Sampling temperature sent to both providers.
pub const TEMPERATURE: f32 = 0.7;

/// Which remote API to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "google")]
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Google => "google",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Google => "Google Gemini",
        }
    }

    /// Environment variable consulted for this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Google => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "google" | "gemini" => Ok(Provider::Google),
            other => Err(format!(
                "unknown provider '{other}' (expected 'openai' or 'google')"
            )),
        }
    }
}

/// API key plus the provider it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub provider: Provider,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, provider: Provider) -> Self {
        Self {
            api_key: api_key.into(),
            provider,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_key(&self.api_key))
            .field("provider", &self.provider)
            .finish()
    }
}

/// Show only the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// A success response body, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The capability every provider adapter implements.
///
/// `send` performs exactly one HTTP request and never retries. `parse`
/// fails only when the body is not JSON; valid JSON without a caption yields
/// [`FALLBACK_CAPTION`].
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Provider name for logging (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Dispatch the prompt and image to the provider.
    async fn send(&self, prompt: &str, image: &EncodedImage, api_key: &str)
        -> Result<RawResponse>;

    /// Extract the caption text from a success response.
    fn parse(&self, raw: &RawResponse) -> Result<String>;
}

/// Closed set of adapters, one per [`Provider`].
pub enum ProviderAdapter {
    OpenAi(OpenAiAdapter),
    Gemini(GeminiAdapter),
}

impl ProviderAdapter {
    /// Build the adapter matching `provider` from configuration.
    pub fn for_provider(
        provider: Provider,
        providers: &ProvidersConfig,
        limits: &LimitsConfig,
        client: reqwest::Client,
    ) -> Self {
        let timeout = Duration::from_millis(limits.request_timeout_ms);
        match provider {
            Provider::OpenAi => ProviderAdapter::OpenAi(OpenAiAdapter::new(
                client,
                &providers.openai.endpoint,
                &providers.openai.model,
                timeout,
            )),
            Provider::Google => ProviderAdapter::Gemini(GeminiAdapter::new(
                client,
                &providers.gemini.endpoint,
                &providers.gemini.model,
                timeout,
            )),
        }
    }

    /// The provider this adapter speaks to.
    pub fn provider(&self) -> Provider {
        match self {
            ProviderAdapter::OpenAi(_) => Provider::OpenAi,
            ProviderAdapter::Gemini(_) => Provider::Google,
        }
    }

    fn inner(&self) -> &dyn CaptionProvider {
        match self {
            ProviderAdapter::OpenAi(adapter) => adapter,
            ProviderAdapter::Gemini(adapter) => adapter,
        }
    }
}

#[async_trait]
impl CaptionProvider for ProviderAdapter {
    fn name(&self) -> &str {
        self.inner().name()
    }

    async fn send(
        &self,
        prompt: &str,
        image: &EncodedImage,
        api_key: &str,
    ) -> Result<RawResponse> {
        self.inner().send(prompt, image, api_key).await
    }

    fn parse(&self, raw: &RawResponse) -> Result<String> {
        self.inner().parse(raw)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Build the error for a non-success response.
///
/// Uses the provider's `error.message` when the body carries one, otherwise
/// a message naming the status code.
pub(crate) fn http_error(status: u16, body: &str) -> CaptionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {status}"));
    CaptionError::Http { status, message }
}

/// Send a prepared request and collect a success body.
pub(crate) async fn dispatch(
    name: &str,
    request: reqwest::RequestBuilder,
) -> Result<RawResponse> {
    let resp = request
        .send()
        .await
        .map_err(|e| CaptionError::Network(format!("{name} request failed: {e}")))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| CaptionError::Network(format!("{name} response read failed: {e}")))?;

    if !status.is_success() {
        tracing::debug!(provider = name, status = status.as_u16(), "Provider rejected request");
        return Err(http_error(status.as_u16(), &body));
    }

    Ok(RawResponse {
        status: status.as_u16(),
        body,
    })
}

/// Decode a success body, failing when it is not JSON of the expected shape.
pub(crate) fn decode_body<T: DeserializeOwned>(name: &str, raw: &RawResponse) -> Result<T> {
    serde_json::from_str(&raw.body).map_err(|e| {
        CaptionError::Decode(format!(
            "{name} returned status {} with an undecodable body: {e}",
            raw.status
        ))
    })
}

/// Return `caption`, or the fallback when it is missing or empty.
pub(crate) fn caption_or_fallback(name: &str, caption: Option<String>) -> String {
    match caption {
        Some(text) if !text.is_empty() => text,
        _ => {
            tracing::warn!(provider = name, "Response had no caption text, using fallback");
            FALLBACK_CAPTION.to_string()
        }
    }
}
