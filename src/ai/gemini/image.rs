use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::{GenerationOptions, ImageGenerationService};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
    candidate_count: u32,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

/// Derive a Gemini aspect ratio from a `WIDTHxHEIGHT` size string.
fn aspect_ratio(size: &str) -> &'static str {
    let parsed = size
        .split_once('x')
        .and_then(|(w, h)| Some((w.trim().parse::<u32>().ok()?, h.trim().parse::<u32>().ok()?)));
    match parsed {
        Some((w, h)) if w > h => "16:9",
        Some((w, h)) if w < h => "9:16",
        _ => "1:1",
    }
}

/// Gemini image generation. Gemini returns image bytes inline, so the
/// reference handed back is a `data:` URL.
pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<String>> {
        // Gemini has no quality tier; only the shape of the size is used.
        let request = ImageRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                candidate_count: 1,
                image_config: ImageConfig {
                    aspect_ratio: aspect_ratio(&options.size).to_string(),
                },
            },
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let reference = response.first_parts().iter().find_map(|part| match part {
            Part::InlineData { inline_data } if !inline_data.data.is_empty() => Some(format!(
                "data:{};base64,{}",
                inline_data.mime_type, inline_data.data
            )),
            _ => None,
        });

        if let Some(reference) = &reference {
            tracing::debug!("Gemini returned inline image ({} chars)", reference.len());
        }

        Ok(reference)
    }
}
