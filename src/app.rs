//! Service wiring: turns a [`Config`] into the shared state the HTTP layer
//! runs on.

use crate::ai::{
    DescriptionService, GeminiDescriptionClient, GeminiImageClient, GenerationOptions,
    ImageGenerationService, OpenAiDescriptionClient, OpenAiImageClient,
};
use crate::config::Config;
use crate::http::AppState;
use crate::models::AiProvider;
use crate::pipeline::TransformationPipeline;
use crate::store::{MemoryStore, RecordStore};
use crate::Result;
use std::sync::Arc;
use tracing::info;

/// Injectable service bundle used to build [`AppState`] in tests/harnesses.
pub struct AppServices {
    pub describer: Arc<dyn DescriptionService>,
    pub generator: Arc<dyn ImageGenerationService>,
    pub store: Arc<dyn RecordStore>,
    pub options: GenerationOptions,
}

impl AppServices {
    pub fn into_state(self) -> AppState {
        AppState {
            pipeline: Arc::new(TransformationPipeline::new(
                self.describer,
                self.generator,
                self.options,
            )),
            store: self.store,
        }
    }
}

fn build_ai_client<T, FOpenAi, FGemini>(
    provider: AiProvider,
    model: &str,
    api_key: String,
    http_client: reqwest::Client,
    capability: &str,
    openai_builder: FOpenAi,
    gemini_builder: FGemini,
) -> T
where
    FOpenAi: FnOnce(String, String, reqwest::Client) -> T,
    FGemini: FnOnce(String, String, reqwest::Client) -> T,
{
    match provider {
        AiProvider::OpenAi => {
            info!("{} provider: OpenAI (model: {})", capability, model);
            openai_builder(api_key, model.to_string(), http_client)
        }
        AiProvider::Gemini => {
            info!("{} provider: Gemini (model: {})", capability, model);
            gemini_builder(api_key, model.to_string(), http_client)
        }
    }
}

/// Build the real provider clients and an empty in-memory store.
pub fn build_services(config: &Config) -> Result<AppServices> {
    // Reuse one HTTP connection pool across provider clients.
    let http_client = reqwest::Client::new();

    let describer: Arc<dyn DescriptionService> = build_ai_client(
        config.describe_provider,
        &config.describe_model,
        config.api_key_for(config.describe_provider)?.to_string(),
        http_client.clone(),
        "Description",
        |api_key, model, client| {
            Arc::new(OpenAiDescriptionClient::new_with_client(api_key, model, client))
                as Arc<dyn DescriptionService>
        },
        |api_key, model, client| {
            Arc::new(GeminiDescriptionClient::new_with_client(api_key, model, client))
                as Arc<dyn DescriptionService>
        },
    );

    let generator: Arc<dyn ImageGenerationService> = build_ai_client(
        config.generate_provider,
        &config.generate_model,
        config.api_key_for(config.generate_provider)?.to_string(),
        http_client,
        "Generation",
        |api_key, model, client| {
            Arc::new(OpenAiImageClient::new_with_client(api_key, model, client))
                as Arc<dyn ImageGenerationService>
        },
        |api_key, model, client| {
            Arc::new(GeminiImageClient::new_with_client(api_key, model, client))
                as Arc<dyn ImageGenerationService>
        },
    );

    info!(
        "Generation output: size {}, quality {}",
        config.image_size, config.image_quality
    );

    Ok(AppServices {
        describer,
        generator,
        store: Arc::new(MemoryStore::new()),
        options: GenerationOptions {
            size: config.image_size.clone(),
            quality: config.image_quality.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(describe: AiProvider, generate: AiProvider) -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            gemini_api_key: None,
            describe_provider: describe,
            describe_model: describe.default_describe_model().to_string(),
            generate_provider: generate,
            generate_model: generate.default_generate_model().to_string(),
            image_size: "1024x1792".to_string(),
            image_quality: "hd".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        }
    }

    #[test]
    fn test_build_services_copies_generation_options() {
        let services = build_services(&config(AiProvider::OpenAi, AiProvider::OpenAi)).unwrap();

        assert_eq!(
            services.options,
            GenerationOptions {
                size: "1024x1792".to_string(),
                quality: "hd".to_string(),
            }
        );
    }

    #[test]
    fn test_build_services_requires_key_for_selected_provider() {
        let result = build_services(&config(AiProvider::Gemini, AiProvider::OpenAi));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
