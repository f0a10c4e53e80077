//! Data models and structures
//!
//! Defines the style identifiers, provider selection, and the three record
//! kinds kept by the store.

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    Lego,
    Anime,
    Ghibli,
    Futuristic,
    Vintage,
}

impl StyleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::Lego => "lego",
            StyleId::Anime => "anime",
            StyleId::Ghibli => "ghibli",
            StyleId::Futuristic => "futuristic",
            StyleId::Vintage => "vintage",
        }
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lego" => Ok(StyleId::Lego),
            "anime" => Ok(StyleId::Anime),
            "ghibli" => Ok(StyleId::Ghibli),
            "futuristic" => Ok(StyleId::Futuristic),
            "vintage" => Ok(StyleId::Vintage),
            other => Err(Error::UnknownStyle(other.to_string())),
        }
    }
}

/// Which vendor backs a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

impl AiProvider {
    pub fn default_describe_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-4o",
            AiProvider::Gemini => "gemini-2.5-flash",
        }
    }

    pub fn default_generate_model(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "dall-e-3",
            AiProvider::Gemini => "gemini-2.5-flash-image",
        }
    }
}

impl FromStr for AiProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(AiProvider::OpenAi),
            "gemini" => Ok(AiProvider::Gemini),
            other => Err(Error::Config(format!(
                "Unknown AI provider '{}'. Expected 'openai' or 'gemini'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: u64,
    pub original_filename: String,
    pub original_url: String,
    pub user_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub original_filename: String,
    pub original_url: String,
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    pub id: u64,
    /// Soft reference; the image may not exist.
    pub image_id: u64,
    pub style: StyleId,
    pub transformed_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransformation {
    pub image_id: u64,
    pub style: StyleId,
    pub transformed_url: String,
}
