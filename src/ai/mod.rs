//! AI capability integration
//!
//! The pipeline sees two opaque capabilities: one that describes an image in
//! text, and one that turns a text prompt into an image reference. OpenAI and
//! Gemini implementations are provided, plus mocks for tests.

pub mod gemini;
pub mod mock;
pub mod openai;

pub use gemini::{GeminiDescriptionClient, GeminiImageClient};
pub use mock::{MockDescriptionClient, MockImageGenerationClient};
pub use openai::{OpenAiDescriptionClient, OpenAiImageClient};

use crate::mime::ImageMime;
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;

/// Output settings for a generation request. One image is always requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Resolution such as `1024x1024`.
    pub size: String,
    /// Provider quality tier such as `standard` or `hd`.
    pub quality: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            size: crate::config::DEFAULT_IMAGE_SIZE.to_string(),
            quality: crate::config::DEFAULT_IMAGE_QUALITY.to_string(),
        }
    }
}

/// Vision-to-text capability.
#[async_trait]
pub trait DescriptionService: Send + Sync {
    /// Describe `image` following `instruction`.
    ///
    /// `Ok(None)` means the provider answered but produced no text.
    async fn describe(
        &self,
        instruction: &str,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Option<String>>;
}

/// Text-to-image capability.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generate one image and return an addressable reference to it.
    ///
    /// `Ok(None)` means the provider answered but returned no image.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<Option<String>>;
}

/// Encode raw image bytes as a `data:` URL.
pub fn data_url(mime: &str, image: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(image)
    )
}
