//! Style enum and fixed sampling parameters for the generation service.
//!
//! The wire labels (`"Digital Art"`, `"(No style)"`, ...) are dictated by
//! the hosted PhotoMaker pipeline and must round-trip exactly.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pipeline variant sent with every request.
pub const BASE_PIPELINE: &str = "photomaker-style";

/// Negative prompt applied to every generation.
pub const NEGATIVE_PROMPT: &str = "nsfw, lowres, bad anatomy, bad hands, text, error, \
     missing fingers, extra digit, fewer digits, cropped, worst quality, low quality, \
     normal quality, jpeg artifacts, signature, watermark, username, blurry";

/// Diffusion steps per generation.
pub const NUM_INFERENCE_STEPS: u32 = 30;

/// Strength of the selected style (percent).
pub const STYLE_STRENGTH: u32 = 20;

/// Output images per request.
pub const NUM_IMAGES: u32 = 1;

/// Classifier-free guidance scale.
pub const GUIDANCE_SCALE: u32 = 5;

/// Visual treatment applied to the generated portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotomakerStyle {
    #[serde(rename = "(No style)")]
    NoStyle,
    Cinematic,
    Photographic,
    #[serde(rename = "Digital Art")]
    DigitalArt,
    #[serde(rename = "Fantasy art")]
    FantasyArt,
    Neonpunk,
    #[serde(rename = "Disney Character")]
    DisneyCharacter,
    Enhance,
    #[serde(rename = "Comic book")]
    ComicBook,
    Lowpoly,
    #[serde(rename = "Line art")]
    LineArt,
}

impl PhotomakerStyle {
    /// Every accepted style, in display order.
    pub const ALL: [PhotomakerStyle; 11] = [
        PhotomakerStyle::NoStyle,
        PhotomakerStyle::Cinematic,
        PhotomakerStyle::Photographic,
        PhotomakerStyle::DigitalArt,
        PhotomakerStyle::FantasyArt,
        PhotomakerStyle::Neonpunk,
        PhotomakerStyle::DisneyCharacter,
        PhotomakerStyle::Enhance,
        PhotomakerStyle::ComicBook,
        PhotomakerStyle::Lowpoly,
        PhotomakerStyle::LineArt,
    ];

    /// The exact wire label for this style.
    pub fn as_str(self) -> &'static str {
        match self {
            PhotomakerStyle::NoStyle => "(No style)",
            PhotomakerStyle::Cinematic => "Cinematic",
            PhotomakerStyle::Photographic => "Photographic",
            PhotomakerStyle::DigitalArt => "Digital Art",
            PhotomakerStyle::FantasyArt => "Fantasy art",
            PhotomakerStyle::Neonpunk => "Neonpunk",
            PhotomakerStyle::DisneyCharacter => "Disney Character",
            PhotomakerStyle::Enhance => "Enhance",
            PhotomakerStyle::ComicBook => "Comic book",
            PhotomakerStyle::Lowpoly => "Lowpoly",
            PhotomakerStyle::LineArt => "Line art",
        }
    }

    /// Parse a wire label. Unknown labels fail validation so requests are
    /// rejected before any job row is created.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == label)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "unknown style '{label}'; accepted styles: {}",
                    Self::ALL.map(|s| s.as_str()).join(", ")
                ))
            })
    }
}

impl std::fmt::Display for PhotomakerStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PhotomakerStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_parses_its_own_label() {
        for style in PhotomakerStyle::ALL {
            assert_eq!(PhotomakerStyle::parse(style.as_str()).unwrap(), style);
        }
    }

    #[test]
    fn unknown_style_is_a_validation_error() {
        let err = PhotomakerStyle::parse("Vaporwave").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn serde_uses_the_wire_labels() {
        let json = serde_json::to_string(&PhotomakerStyle::DigitalArt).unwrap();
        assert_eq!(json, "\"Digital Art\"");

        let style: PhotomakerStyle = serde_json::from_str("\"(No style)\"").unwrap();
        assert_eq!(style, PhotomakerStyle::NoStyle);
    }
}
