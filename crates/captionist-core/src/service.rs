//! Caption generation service.
//!
//! Ties the pieces together for one set of credentials: build the prompt,
//! encode the image, dispatch through the provider's adapter, and return the
//! caption text. Nothing is cached; every call is one outbound request.

use crate::config::Config;
use crate::error::Result;
use crate::image::{ImageEncoder, ImageResource};
use crate::llm::{CaptionProvider, Credentials, Provider, ProviderAdapter};
use crate::options::CaptionOptions;
use crate::prompt::build_prompt;
use std::time::Instant;

/// Generates captions with a single provider and API key.
pub struct CaptionService {
    credentials: Credentials,
    adapter: ProviderAdapter,
    encoder: ImageEncoder,
}

impl CaptionService {
    /// Create a service with default endpoints and models. Images of any
    /// size are sent.
    pub fn new(credentials: Credentials) -> Self {
        Self::build(credentials, &Config::default(), ImageEncoder::new())
    }

    /// Create a service using endpoints, models, and limits from `config`,
    /// including the `[limits] max_file_size_mb` image cap.
    pub fn with_config(credentials: Credentials, config: &Config) -> Self {
        let encoder = ImageEncoder::with_max_file_size_mb(config.limits.max_file_size_mb);
        Self::build(credentials, config, encoder)
    }

    fn build(credentials: Credentials, config: &Config, encoder: ImageEncoder) -> Self {
        let adapter = ProviderAdapter::for_provider(
            credentials.provider,
            &config.providers,
            &config.limits,
            reqwest::Client::new(),
        );
        Self {
            credentials,
            adapter,
            encoder,
        }
    }

    pub fn provider(&self) -> Provider {
        self.credentials.provider
    }

    /// Generate a caption for `image` styled by `options`.
    ///
    /// Failures are logged and returned to the caller unchanged. A success
    /// response without caption text resolves to the fallback caption.
    pub async fn generate_caption(
        &self,
        image: &ImageResource,
        options: &CaptionOptions,
    ) -> Result<String> {
        match self.run(image, options).await {
            Ok(caption) => Ok(caption),
            Err(e) => {
                tracing::error!(
                    provider = %self.credentials.provider,
                    error = %e,
                    "Error generating caption"
                );
                Err(e)
            }
        }
    }

    async fn run(&self, image: &ImageResource, options: &CaptionOptions) -> Result<String> {
        let start = Instant::now();
        let prompt = build_prompt(options);
        let encoded = self.encoder.encode(image).await?;

        tracing::debug!(
            provider = self.adapter.name(),
            mime_type = %encoded.mime_type,
            prompt_len = prompt.len(),
            "Sending caption request"
        );

        let raw = self
            .adapter
            .send(&prompt, &encoded, &self.credentials.api_key)
            .await?;
        let caption = self.adapter.parse(&raw)?;

        tracing::info!(
            provider = self.adapter.name(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Caption generated"
        );
        Ok(caption)
    }
}
