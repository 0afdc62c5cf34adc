//! Instruction prompt construction.
//!
//! The prompt is assembled from fixed clauses in a fixed order: preamble,
//! tone, length, platform (omitted for `general`), hashtags, closing.

use crate::options::{CaptionOptions, Length, Platform, Tone};

const PREAMBLE: &str = "Analyze this image and create a compelling caption for social media.";

const CLOSING: &str = "Focus on what makes this image special, interesting, or worth sharing. \
                       Be authentic and engaging.";

const HASHTAGS_ON: &str = "Include 3-5 relevant hashtags at the end.";
const HASHTAGS_OFF: &str = "Do not include hashtags.";

fn tone_clause(tone: Tone) -> &'static str {
    match tone {
        Tone::Casual => "Use a casual, friendly tone that feels conversational and relatable.",
        Tone::Professional => "Use a professional, polished tone suitable for business contexts.",
        Tone::Creative => {
            "Use a creative, engaging tone with vivid descriptions and storytelling elements."
        }
        Tone::Funny => "Use a humorous, witty tone that's entertaining and light-hearted.",
    }
}

fn length_clause(length: Length) -> &'static str {
    match length {
        Length::Short => "Keep it concise (1-2 sentences, under 50 words).",
        Length::Medium => "Make it moderately detailed (2-3 sentences, 50-100 words).",
        Length::Long => "Create a detailed caption (3-5 sentences, 100-150 words).",
    }
}

fn platform_clause(platform: Platform) -> Option<&'static str> {
    match platform {
        Platform::Instagram => {
            Some("Optimize for Instagram with visual storytelling and engagement.")
        }
        Platform::Twitter => Some("Keep it concise and punchy for Twitter, under 280 characters."),
        Platform::Linkedin => {
            Some("Make it professional and suitable for LinkedIn's business audience.")
        }
        Platform::Facebook => {
            Some("Create engaging content suitable for Facebook's diverse audience.")
        }
        Platform::General => None,
    }
}

/// Build the caption instruction for the given options.
///
/// Omitted options take their defaults, so this never fails and always
/// returns the same string for the same input.
pub fn build_prompt(options: &CaptionOptions) -> String {
    let resolved = options.resolve();

    let mut clauses = vec![
        PREAMBLE,
        tone_clause(resolved.tone),
        length_clause(resolved.length),
    ];
    if let Some(clause) = platform_clause(resolved.platform) {
        clauses.push(clause);
    }
    clauses.push(if resolved.include_hashtags {
        HASHTAGS_ON
    } else {
        HASHTAGS_OFF
    });
    clauses.push(CLOSING);

    clauses.join(" ")
}
