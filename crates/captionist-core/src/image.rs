//! Image sources and their base64 transport encoding.
//!
//! An [`ImageResource`] is the caller's image: raw bytes (or a path read
//! lazily) plus its declared MIME type. [`ImageEncoder`] turns it into an
//! [`EncodedImage`], a bare base64 payload with no data-URI prefix that the
//! provider adapters embed in their request bodies.

use crate::error::{CaptionError, Result};
use base64::Engine;
use std::borrow::Cow;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Formats accepted as caption input.
pub const SUPPORTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Where the image bytes live.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes already in memory
    Bytes(Vec<u8>),
    /// File read when the image is encoded
    Path(PathBuf),
}

/// A caller-owned image plus its declared MIME type.
#[derive(Debug, Clone)]
pub struct ImageResource {
    source: ImageSource,
    mime_type: String,
}

impl ImageResource {
    /// Wrap in-memory bytes with a declared MIME type.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            source: ImageSource::Bytes(bytes.into()),
            mime_type: mime_type.into(),
        }
    }

    /// Reference an image file on disk.
    ///
    /// The MIME type comes from the file extension, or from the file's magic
    /// bytes when the extension is missing or unfamiliar. The file contents
    /// are not read until the image is encoded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = match mime_from_extension(path) {
            Some(mime) => mime,
            None => sniff_file(path)?,
        };
        Ok(Self {
            source: ImageSource::Path(path.to_path_buf()),
            mime_type: mime_type.to_string(),
        })
    }

    /// Parse a `data:<mime>;base64,<payload>` URL into an in-memory image.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| CaptionError::read("not a data URL"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| CaptionError::read("data URL has no payload"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| CaptionError::read("data URL is not base64-encoded"))?;
        if !SUPPORTED_MIME_TYPES.contains(&mime_type) {
            return Err(CaptionError::read(format!(
                "unsupported image type {mime_type}"
            )));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| CaptionError::read(format!("invalid base64 payload: {e}")))?;
        Ok(Self::from_bytes(bytes, mime_type))
    }

    /// Declared MIME type (e.g. "image/png").
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    async fn read(&self) -> Result<Cow<'_, [u8]>> {
        match &self.source {
            ImageSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            ImageSource::Path(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|e| CaptionError::read(format!("{}: {e}", path.display()))),
        }
    }
}

/// Base64 image payload ready to embed in a provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Standard base64, padded, no line breaks, no data-URI prefix
    pub data: String,
    /// MIME type declared by the source image
    pub mime_type: String,
}

impl EncodedImage {
    /// Data URL with an explicit MIME type, which may differ from the declared one.
    pub fn data_url_as(&self, mime_type: &str) -> String {
        format!("data:{};base64,{}", mime_type, self.data)
    }
}

/// Reads image sources and encodes them for transport.
#[derive(Debug, Clone, Default)]
pub struct ImageEncoder {
    max_bytes: Option<u64>,
}

impl ImageEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject images larger than `max_mb` megabytes instead of sending them.
    pub fn with_max_file_size_mb(max_mb: u64) -> Self {
        Self {
            max_bytes: Some(max_mb.saturating_mul(1024 * 1024)),
        }
    }

    /// Size cap in bytes, if any.
    pub fn max_bytes(&self) -> Option<u64> {
        self.max_bytes
    }

    /// Read the image once and return its base64 encoding.
    pub async fn encode(&self, image: &ImageResource) -> Result<EncodedImage> {
        let bytes = image.read().await?;

        if bytes.is_empty() {
            return Err(CaptionError::read("image is empty"));
        }
        if let Some(max) = self.max_bytes {
            let len = bytes.len() as u64;
            if len > max {
                return Err(CaptionError::read(format!(
                    "image is {len} bytes, limit is {max} bytes"
                )));
            }
        }

        let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
        tracing::debug!(
            bytes = bytes.len(),
            mime_type = %image.mime_type,
            "Encoded image"
        );

        Ok(EncodedImage {
            data: encoded,
            mime_type: image.mime_type.clone(),
        })
    }
}

/// Encode an image with no size limit.
pub async fn encode(image: &ImageResource) -> Result<EncodedImage> {
    ImageEncoder::new().encode(image).await
}

/// Drop a leading `data:...;base64,` prefix if present.
pub fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.starts_with("data:") {
        payload
            .split_once(',')
            .map(|(_, data)| data)
            .unwrap_or(payload)
    } else {
        payload
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn sniff_file(path: &Path) -> Result<&'static str> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| CaptionError::read(format!("{}: {e}", path.display())))?;
    let mut header = [0u8; 12];
    let bytes_read = file
        .read(&mut header)
        .map_err(|e| CaptionError::read(format!("{}: {e}", path.display())))?;

    sniff_mime(&header[..bytes_read]).ok_or_else(|| {
        CaptionError::read(format!(
            "{}: unsupported image format (expected JPEG, PNG, GIF or WebP)",
            path.display()
        ))
    })
}

/// Identify a supported image format from its leading bytes.
pub fn sniff_mime(header: &[u8]) -> Option<&'static str> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}
