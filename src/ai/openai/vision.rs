use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ChatMessageContent, ImageUrl, MessagePart};
use crate::ai::{data_url, DescriptionService};
use crate::mime::ImageMime;
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiDescriptionClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiDescriptionClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(60), client),
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
impl DescriptionService for OpenAiDescriptionClient {
    async fn describe(
        &self,
        instruction: &str,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Option<String>> {
        tracing::debug!(
            "Requesting description for {} image ({} bytes) from OpenAI",
            mime,
            image.len()
        );

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::Parts(vec![
                MessagePart::Text {
                    text: instruction.to_string(),
                },
                MessagePart::ImageUrl {
                    image_url: ImageUrl {
                        url: data_url(mime.as_str(), image),
                        detail: Some("high".to_string()),
                    },
                },
            ])),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![user_message],
            max_completion_tokens: 1000,
        };

        let response = self.http.chat_completion(&request).await?;

        let description = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| match choice.message.content {
                Some(ChatMessageContent::Text(text)) => Some(text),
                _ => None,
            });

        Ok(description)
    }
}
