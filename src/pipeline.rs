//! Two-stage style transformation
//!
//! An image is first described in text by a vision model, the description is
//! merged with the chosen style's prompt, and an image model renders the
//! result. Stages run strictly in order with no retries and nothing is
//! persisted here.

use crate::ai::{DescriptionService, GenerationOptions, ImageGenerationService};
use crate::error::Stage;
use crate::mime::ImageMime;
use crate::{prompts, styles, Error, Result};
use base64::Engine as _;
use std::sync::Arc;
use tracing::{info, warn};

pub struct TransformationPipeline {
    describer: Arc<dyn DescriptionService>,
    generator: Arc<dyn ImageGenerationService>,
    options: GenerationOptions,
}

impl TransformationPipeline {
    pub fn new(
        describer: Arc<dyn DescriptionService>,
        generator: Arc<dyn ImageGenerationService>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            describer,
            generator,
            options,
        }
    }

    /// Restyle `image` and return a reference to the generated picture.
    ///
    /// The style is resolved before any provider is called.
    pub async fn transform(&self, image: &[u8], style: &str) -> Result<String> {
        let style_prompt = styles::prompt_for(style)?;

        if image.is_empty() {
            return Err(Error::InvalidRequest("image data is empty".to_string()));
        }

        let mime = ImageMime::sniff_or_png(image);
        info!(
            "[{}] Describing {} image ({} bytes)",
            style,
            mime,
            image.len()
        );

        let description = self
            .describer
            .describe(prompts::DESCRIBE_INSTRUCTION.trim(), image, mime)
            .await
            .map_err(|e| e.at_stage(Stage::Describe))?
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                warn!("[{}] Description provider returned nothing", style);
                Error::DescriptionUnavailable
            })?;
        info!("[{}] Got description ({} chars)", style, description.len());

        let instruction = prompts::generation_instruction(style_prompt, &description);

        let reference = self
            .generator
            .generate(&instruction, &self.options)
            .await
            .map_err(|e| e.at_stage(Stage::Generate))?
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                warn!("[{}] Generation provider returned no image", style);
                Error::GenerationFailed
            })?;
        info!("[{}] Generated image", style);

        Ok(reference)
    }

    /// Like [`TransformationPipeline::transform`], for a base64 payload.
    ///
    /// Accepts plain base64 or a `data:<mime>;base64,` URL.
    pub async fn transform_base64(&self, image_base64: &str, style: &str) -> Result<String> {
        styles::prompt_for(style)?;
        let image = decode_image_base64(image_base64)?;
        self.transform(&image, style).await
    }
}

/// Decode client-supplied image data, tolerating a `data:` URL prefix and
/// surrounding whitespace.
pub fn decode_image_base64(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| Error::InvalidRequest("data URL is not base64-encoded".to_string()))?,
        None => trimmed,
    };

    if payload.is_empty() {
        return Err(Error::InvalidRequest("imageBase64 is empty".to_string()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Error::InvalidRequest(format!("imageBase64 is not valid base64: {}", e)))
}
