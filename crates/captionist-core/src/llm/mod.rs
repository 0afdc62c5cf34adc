//! Provider adapters for multimodal caption generation.
//!
//! Two incompatible HTTP APIs (OpenAI Chat Completions and Gemini
//! generateContent) sit behind one capability, [`CaptionProvider`], and a
//! closed enum, [`ProviderAdapter`], chosen from the credentials' provider tag.

pub(crate) mod gemini;
pub(crate) mod openai;
pub(crate) mod provider;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use provider::{
    mask_key, CaptionProvider, Credentials, Provider, ProviderAdapter, RawResponse,
    FALLBACK_CAPTION, MAX_OUTPUT_TOKENS, TEMPERATURE,
};
