//! OpenAI adapter using the Chat Completions API.
//!
//! Sends the prompt and image as two content parts of one user message. The
//! image always travels as a `data:image/jpeg;base64,...` URL, whatever the
//! declared type of the source image.

use super::provider::{
    caption_or_fallback, decode_body, dispatch, CaptionProvider, RawResponse, MAX_OUTPUT_TOKENS, TEMPERATURE,
};
use crate::error::Result;
use crate::image::EncodedImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// MIME type written into the image data URL.
const DATA_URL_MIME: &str = "image/jpeg";

/// OpenAI adapter using Chat Completions.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    fn build_body(&self, prompt: &str, image: &EncodedImage) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: prompt.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url_as(DATA_URL_MIME),
                        },
                    },
                ],
            }],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CaptionProvider for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    async fn send(
        &self,
        prompt: &str,
        image: &EncodedImage,
        api_key: &str,
    ) -> Result<RawResponse> {
        let body = self.build_body(prompt, image);

        let request = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout);

        dispatch("OpenAI", request).await
    }

    fn parse(&self, raw: &RawResponse) -> Result<String> {
        let resp: ChatResponse = decode_body(self.name(), raw)?;
        let caption = resp
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        Ok(caption_or_fallback(self.name(), caption))
    }
}
