use super::{DescriptionService, GenerationOptions, ImageGenerationService};
use crate::mime::ImageMime;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// What a mock hands back on each call.
#[derive(Debug, Clone)]
enum Reply {
    Value(Option<String>),
    Failure(String),
}

impl Reply {
    fn to_result(&self) -> Result<Option<String>> {
        match self {
            Reply::Value(value) => Ok(value.clone()),
            Reply::Failure(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

/// Replies cycle when more calls arrive than were configured.
fn next_reply(replies: &[Reply], call: usize, default: &str) -> Result<Option<String>> {
    if replies.is_empty() {
        return Ok(Some(default.to_string()));
    }
    replies[(call - 1) % replies.len()].to_result()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeCall {
    pub instruction: String,
    pub image_len: usize,
    pub mime: ImageMime,
}

#[derive(Clone, Default)]
pub struct MockDescriptionClient {
    replies: Arc<Mutex<Vec<Reply>>>,
    calls: Arc<Mutex<Vec<DescribeCall>>>,
}

impl MockDescriptionClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(self, description: &str) -> Self {
        self.push(Reply::Value(Some(description.to_string())))
    }

    pub fn with_no_description(self) -> Self {
        self.push(Reply::Value(None))
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(Reply::Failure(message.to_string()))
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<DescribeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DescriptionService for MockDescriptionClient {
    async fn describe(
        &self,
        instruction: &str,
        image: &[u8],
        mime: ImageMime,
    ) -> Result<Option<String>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(DescribeCall {
                instruction: instruction.to_string(),
                image_len: image.len(),
                mime,
            });
            calls.len()
        };

        let replies = self.replies.lock().unwrap();
        next_reply(&replies, call, "A person standing in a sunny park")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub prompt: String,
    pub options: GenerationOptions,
}

#[derive(Clone, Default)]
pub struct MockImageGenerationClient {
    replies: Arc<Mutex<Vec<Reply>>>,
    calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_url(self, url: &str) -> Self {
        self.push(Reply::Value(Some(url.to_string())))
    }

    pub fn with_no_image(self) -> Self {
        self.push(Reply::Value(None))
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.push(Reply::Failure(message.to_string()))
    }

    fn push(self, reply: Reply) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Option<String>> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(GenerateCall {
                prompt: prompt.to_string(),
                options: options.clone(),
            });
            calls.len()
        };

        let replies = self.replies.lock().unwrap();
        next_reply(&replies, call, "https://mock-images.example.com/generated.png")
    }
}
