//! Google Gemini adapter using the generateContent API.
//!
//! The API key travels as the `key` query parameter; no auth header is sent.
//! The image is sent as inline data with its declared MIME type.

use super::provider::{
    caption_or_fallback, decode_body, dispatch, CaptionProvider, RawResponse, MAX_OUTPUT_TOKENS, TEMPERATURE,
};
use crate::error::Result;
use crate::image::EncodedImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini adapter using generateContent.
pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    /// Endpoint URL without the key parameter.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_body(&self, prompt: &str, image: &EncodedImage) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[async_trait]
impl CaptionProvider for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
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
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout);

        dispatch("Gemini", request).await
    }

    fn parse(&self, raw: &RawResponse) -> Result<String> {
        let resp: GenerateResponse = decode_body(self.name(), raw)?;
        let caption = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text);
        Ok(caption_or_fallback(self.name(), caption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptionError;
    use crate::llm::provider::FALLBACK_CAPTION;
    use mockito::Matcher;
    use serde_json::json;

    fn adapter(base_url: &str) -> GeminiAdapter {
        GeminiAdapter::new(
            reqwest::Client::new(),
            base_url,
            "gemini-1.5-flash",
            Duration::from_secs(5),
        )
    }

    fn webp_image() -> EncodedImage {
        EncodedImage {
            data: "UklGRg==".to_string(),
            mime_type: "image/webp".to_string(),
        }
    }

    fn raw(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_endpoint_shape() {
        let adapter = adapter("https://generativelanguage.googleapis.com/v1beta/");
        assert_eq!(
            adapter.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_body_keeps_declared_mime_type() {
        let body = adapter("http://unused").build_body("Describe", &webp_image());
        let value = serde_json::to_value(&body).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Describe");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/webp");
        assert_eq!(parts[1]["inline_data"]["data"], "UklGRg==");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 300);
        let temperature = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_parse_extracts_first_part_text() {
        let caption = adapter("http://unused")
            .parse(&raw(
                r#"{"candidates":[{"content":{"parts":[{"text":"Golden hour"}],"role":"model"}}]}"#,
            ))
            .unwrap();
        assert_eq!(caption, "Golden hour");
    }

    #[test]
    fn test_parse_falls_back_on_missing_fields() {
        let adapter = adapter("http://unused");
        assert_eq!(adapter.parse(&raw(r#"{"candidates":[]}"#)).unwrap(), FALLBACK_CAPTION);
        assert_eq!(
            adapter.parse(&raw(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)).unwrap(),
            FALLBACK_CAPTION
        );
        assert_eq!(
            adapter.parse(&raw(r#"{"candidates":[{"content":{"parts":[]}}]}"#)).unwrap(),
            FALLBACK_CAPTION
        );
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        let err = adapter("http://unused").parse(&raw("")).unwrap_err();
        assert!(matches!(err, CaptionError::Decode(_)));
    }

    #[tokio::test]
    async fn test_send_puts_key_in_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "g-test".into()))
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "maxOutputTokens": 300 }
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]}"#)
            .create_async()
            .await;

        let adapter = adapter(&server.url());
        let response = adapter.send("prompt", &webp_image(), "g-test").await.unwrap();

        assert_eq!(adapter.parse(&response).unwrap(), "Hi");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_without_error_body_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let adapter = adapter(&server.url());
        let err = adapter
            .send("prompt", &webp_image(), "g-test")
            .await
            .unwrap_err();

        assert!(matches!(err, CaptionError::Http { status: 503, .. }));
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_send_connection_failure_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let adapter = adapter("http://127.0.0.1:9");
        let err = adapter
            .send("prompt", &webp_image(), "g-test")
            .await
            .unwrap_err();
        assert!(matches!(err, CaptionError::Network(_)));
    }
}
