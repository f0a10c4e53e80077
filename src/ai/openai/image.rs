use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{GenerationOptions, ImageGenerationService};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(120), client),
            model,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<String>> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: options.size.clone(),
            quality: options.quality.clone(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let Some(image_data) = response.data.into_iter().next() else {
            return Ok(None);
        };

        // Models that only return base64 get an inline data URL instead.
        let reference = match (image_data.url, image_data.b64_json) {
            (Some(url), _) if !url.is_empty() => Some(url),
            (_, Some(b64_json)) if !b64_json.is_empty() => {
                Some(format!("data:image/png;base64,{}", b64_json))
            }
            _ => None,
        };

        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> OpenAiImageClient {
        OpenAiImageClient::new("key".to_string(), "dall-e-3".to_string())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_returns_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": "https://images.test/out.png" }]
            })))
            .mount(&server)
            .await;

        let reference = make_client(&server)
            .generate("a dream", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reference.as_deref(), Some("https://images.test/out.png"));
    }

    #[tokio::test]
    async fn test_generate_turns_b64_into_data_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "b64_json": "iVBORw0=" }]
            })))
            .mount(&server)
            .await;

        let reference = make_client(&server)
            .generate("a dream", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reference.as_deref(), Some("data:image/png;base64,iVBORw0="));
    }

    #[tokio::test]
    async fn test_generate_sends_one_image_with_options() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(serde_json::json!({
                "model": "dall-e-3",
                "prompt": "a dream",
                "n": 1,
                "size": "1792x1024",
                "quality": "hd"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": "https://images.test/out.png" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = GenerationOptions {
            size: "1792x1024".to_string(),
            quality: "hd".to_string(),
        };
        make_client(&server).generate("a dream", &options).await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_without_data_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{}]
            })))
            .mount(&server)
            .await;

        let reference = make_client(&server)
            .generate("a dream", &GenerationOptions::default())
            .await
            .unwrap();
        assert!(reference.is_none());
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate("a dream", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
