//! Process-wide configuration.
//!
//! Everything the service reads from the environment is gathered here once at
//! startup and handed to the constructors that need it.

use crate::models::AiProvider;
use crate::{Error, Result};

pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "standard";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub describe_provider: AiProvider,
    pub describe_model: String,
    pub generate_provider: AiProvider,
    pub generate_model: String,
    /// Output resolution passed to the generation provider, e.g. `1024x1024`.
    pub image_size: String,
    /// Quality tier passed to the generation provider.
    pub image_quality: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. Fails when a selected provider has no
    /// API key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let describe_provider = match get("DESCRIBE_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::OpenAi,
        };
        let generate_provider = match get("GENERATE_PROVIDER") {
            Some(value) => value.parse()?,
            None => AiProvider::OpenAi,
        };

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("PORT '{}' is not a valid port", value)))?,
            None => DEFAULT_PORT,
        };

        let config = Self {
            openai_api_key: get("OPENAI_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            describe_provider,
            describe_model: get("DESCRIBE_MODEL")
                .unwrap_or_else(|| describe_provider.default_describe_model().to_string()),
            generate_provider,
            generate_model: get("GENERATE_MODEL")
                .unwrap_or_else(|| generate_provider.default_generate_model().to_string()),
            image_size: get("IMAGE_SIZE").unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
            image_quality: get("IMAGE_QUALITY")
                .unwrap_or_else(|| DEFAULT_IMAGE_QUALITY.to_string()),
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        };

        config.api_key_for(config.describe_provider)?;
        config.api_key_for(config.generate_provider)?;

        Ok(config)
    }

    /// API key for `provider`, or a configuration error naming the variable.
    pub fn api_key_for(&self, provider: AiProvider) -> Result<&str> {
        let (key, var) = match provider {
            AiProvider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            AiProvider::Gemini => (&self.gemini_api_key, "GEMINI_API_KEY"),
        };
        key.as_deref()
            .ok_or_else(|| Error::Config(format!("{} not set", var)))
    }
}
