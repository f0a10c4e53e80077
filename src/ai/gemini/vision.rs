use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, InlineData, Part};
use crate::ai::DescriptionService;
use crate::mime::ImageMime;
use crate::Result;
use async_trait::async_trait;
use base64::Engine as _;
use serde::Serialize;
use std::time::Duration;

/// Thinking models spend part of this budget before any text is emitted.
const DESCRIBE_MAX_OUTPUT_TOKENS: u32 = 3000;

#[derive(Debug, Serialize)]
struct DescribeRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: DescribeGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeGenerationConfig {
    max_output_tokens: u32,
}

pub struct GeminiDescriptionClient {
    http: GeminiHttpClient,
}

impl GeminiDescriptionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(60),
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
impl DescriptionService for GeminiDescriptionClient {
    async fn describe(
        &self,
        instruction: &str,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Option<String>> {
        tracing::debug!(
            "Requesting description for {} image ({} bytes) from Gemini",
            mime,
            image.len()
        );

        let request = DescribeRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime.as_str().to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                    Part::Text {
                        text: instruction.to_string(),
                    },
                ],
            }],
            generation_config: DescribeGenerationConfig {
                max_output_tokens: DESCRIBE_MAX_OUTPUT_TOKENS,
            },
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text: Vec<&str> = response
            .first_parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.is_empty() {
            tracing::warn!(
                "Gemini returned no description text (finish reason: {})",
                response.finish_reason().unwrap_or("unknown")
            );
            return Ok(None);
        }
        Ok(Some(text.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_CONTENT_PATH: &str = r"^/v1beta/models/.+:generateContent$";

    fn make_client(server: &MockServer) -> GeminiDescriptionClient {
        GeminiDescriptionClient::new("key".to_string(), "gemini-2.5-flash".to_string())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_describe_joins_text_parts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH))
            .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "A woman in a red coat" }, { "text": "standing by a lake" }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let description = make_client(&server)
            .describe("describe", &[0xFF, 0xD8, 0xFF], ImageMime::Jpeg)
            .await
            .unwrap();
        assert_eq!(
            description.as_deref(),
            Some("A woman in a red coat\nstanding by a lake")
        );
    }

    #[tokio::test]
    async fn test_describe_sends_room_for_thinking_and_handles_truncation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH))
            .and(body_string_contains("\"maxOutputTokens\":3000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "role": "model" },
                    "finishReason": "MAX_TOKENS"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let description = make_client(&server)
            .describe("describe", &[0xFF, 0xD8, 0xFF], ImageMime::Jpeg)
            .await
            .unwrap();
        assert!(description.is_none());
    }

    #[tokio::test]
    async fn test_describe_without_candidates_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let description = make_client(&server)
            .describe("describe", &[0xFF, 0xD8, 0xFF], ImageMime::Jpeg)
            .await
            .unwrap();
        assert!(description.is_none());
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(GENERATE_CONTENT_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .describe("describe", &[0xFF, 0xD8, 0xFF], ImageMime::Jpeg)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::AiProvider(_)));
    }
}
