//! Caption style options.
//!
//! Every field is optional at the boundary. Missing fields are filled from a
//! fixed default set (`creative`, `medium`, hashtags on, `general`) when the
//! options are resolved, so a partially filled value never fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice of the generated caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Professional,
    Creative,
    Funny,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Casual, Tone::Professional, Tone::Creative, Tone::Funny];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Casual => "casual",
            Tone::Professional => "professional",
            Tone::Creative => "creative",
            Tone::Funny => "funny",
        }
    }
}

/// Target caption length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    Medium,
    Long,
}

impl Length {
    pub const ALL: [Length; 3] = [Length::Short, Length::Medium, Length::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        }
    }
}

/// Social platform the caption is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Twitter,
    Facebook,
    Linkedin,
    General,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Twitter,
        Platform::Facebook,
        Platform::Linkedin,
        Platform::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::General => "general",
        }
    }
}

/// Error returned when parsing an option value from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}' (expected one of: {})",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseOptionError {}

fn parse_variant<T: Copy>(
    kind: &'static str,
    value: &str,
    variants: &[T],
    name: fn(&T) -> &'static str,
) -> Result<T, ParseOptionError> {
    let needle = value.trim().to_ascii_lowercase();
    variants
        .iter()
        .find(|v| name(v) == needle)
        .copied()
        .ok_or_else(|| ParseOptionError {
            kind,
            value: value.to_string(),
            expected: variants.iter().map(name).collect::<Vec<_>>().join(", "),
        })
}

impl FromStr for Tone {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("tone", s, &Tone::ALL, Tone::as_str)
    }
}

impl FromStr for Length {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("length", s, &Length::ALL, Length::as_str)
    }
}

impl FromStr for Platform {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant("platform", s, &Platform::ALL, Platform::as_str)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caption style options as supplied by a caller. Any field may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_hashtags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

/// Caption options with every field filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub tone: Tone,
    pub length: Length,
    pub include_hashtags: bool,
    pub platform: Platform,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            tone: Tone::Creative,
            length: Length::Medium,
            include_hashtags: true,
            platform: Platform::General,
        }
    }
}

impl CaptionOptions {
    /// Options with every field set explicitly.
    pub fn new(tone: Tone, length: Length, include_hashtags: bool, platform: Platform) -> Self {
        Self {
            tone: Some(tone),
            length: Some(length),
            include_hashtags: Some(include_hashtags),
            platform: Some(platform),
        }
    }

    /// Fill omitted fields from the default set.
    pub fn resolve(&self) -> ResolvedOptions {
        let defaults = ResolvedOptions::default();
        ResolvedOptions {
            tone: self.tone.unwrap_or(defaults.tone),
            length: self.length.unwrap_or(defaults.length),
            include_hashtags: self.include_hashtags.unwrap_or(defaults.include_hashtags),
            platform: self.platform.unwrap_or(defaults.platform),
        }
    }

    /// Layer `updates` on top of `self`; fields set in `updates` win.
    pub fn overlay(&self, updates: &CaptionOptions) -> CaptionOptions {
        CaptionOptions {
            tone: updates.tone.or(self.tone),
            length: updates.length.or(self.length),
            include_hashtags: updates.include_hashtags.or(self.include_hashtags),
            platform: updates.platform.or(self.platform),
        }
    }
}

impl From<ResolvedOptions> for CaptionOptions {
    fn from(resolved: ResolvedOptions) -> Self {
        Self::new(
            resolved.tone,
            resolved.length,
            resolved.include_hashtags,
            resolved.platform,
        )
    }
}
