//! Error handling and custom error types
//!
//! Provides one closed error taxonomy for the whole service using thiserror.
//! Client-input variants are separated from upstream failures so the HTTP
//! layer can pick a status code with an exhaustive match.

use std::fmt;
use thiserror::Error;

/// Pipeline stage that talks to an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Describe,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Describe => write!(f, "failed to describe image"),
            Stage::Generate => write!(f, "failed to generate image"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("The description provider returned no usable description")]
    DescriptionUnavailable,

    #[error("The generation provider returned no image reference")]
    GenerationFailed,

    #[error("{stage}: {source}")]
    TransformationFailed {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap an upstream failure with the stage it happened in.
    ///
    /// The two "nothing usable" outcomes already name their stage and pass
    /// through unchanged.
    pub fn at_stage(self, stage: Stage) -> Self {
        match self {
            Error::DescriptionUnavailable | Error::GenerationFailed => self,
            other => Error::TransformationFailed {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// True for failures caused by what the client sent.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUpload(_) | Error::UnknownStyle(_) | Error::InvalidRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
