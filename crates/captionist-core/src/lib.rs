//! Captionist Core - social-media captions from images via multimodal APIs.
//!
//! Takes an image and a handful of style options, turns the options into an
//! instruction prompt, sends prompt and image to OpenAI or Gemini, and
//! returns the caption text.
//!
//! # Architecture
//!
//! ```text
//! CaptionOptions → build_prompt ┐
//!                                ├→ ProviderAdapter::send → parse → caption
//! ImageResource  → encode  ──────┘
//! ```
//!
//! The core is stateless: credentials are passed in per service instance and
//! nothing is persisted or cached.
//!
//! # Usage
//!
//! ```rust,ignore
//! use captionist_core::{CaptionOptions, CaptionService, Credentials, ImageResource, Provider};
//!
//! #[tokio::main]
//! async fn main() -> captionist_core::Result<()> {
//!     let service = CaptionService::new(Credentials::new("sk-...", Provider::OpenAi));
//!     let image = ImageResource::from_path("./beach.jpg")?;
//!
//!     let caption = service.generate_caption(&image, &CaptionOptions::default()).await?;
//!     println!("{caption}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod options;
pub mod prompt;
pub mod service;

// Re-exports for convenient access
pub use config::Config;
pub use error::{CaptionError, ConfigError, Result};
pub use image::{EncodedImage, ImageEncoder, ImageResource};
pub use llm::{Credentials, Provider, FALLBACK_CAPTION};
pub use options::{CaptionOptions, Length, Platform, ResolvedOptions, Tone};
pub use prompt::build_prompt;
pub use service::CaptionService;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
