//! Request and response payloads for the generation endpoint.

use serde::{Deserialize, Serialize};

use costumier_core::style::{
    PhotomakerStyle, BASE_PIPELINE, GUIDANCE_SCALE, NEGATIVE_PROMPT, NUM_IMAGES,
    NUM_INFERENCE_STEPS, STYLE_STRENGTH,
};

/// One generation submission. Constructed once per job and immutable
/// afterwards; the fixed sampling parameters are appended when the wire
/// body is built.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Public URL of the uploaded source-image archive.
    pub image_archive_url: String,
    /// Free-text prompt (must contain the `img` trigger word).
    pub prompt: String,
    /// Visual treatment tag.
    pub style: PhotomakerStyle,
}

impl GenerationRequest {
    /// Build the JSON body sent to the service, including the fixed
    /// sampling parameters.
    pub fn to_body(&self) -> serde_json::Value {
        serde_json::json!({
            "image_archive_url": self.image_archive_url,
            "prompt": self.prompt,
            "style": self.style.as_str(),
            "base_pipeline": BASE_PIPELINE,
            "negative_prompt": NEGATIVE_PROMPT,
            "num_inference_steps": NUM_INFERENCE_STEPS,
            "style_strength": STYLE_STRENGTH,
            "num_images": NUM_IMAGES,
            "guidance_scale": GUIDANCE_SCALE,
        })
    }
}

/// One generated output image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Successful generation response; written verbatim into the job's
/// result column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub images: Vec<GeneratedImage>,
}
