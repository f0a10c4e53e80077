//! Restyle - turns a photo into one of a fixed set of art styles
//!
//! Uploaded images are validated and returned base64-encoded. A transform
//! asks a vision model to describe the picture, combines that description
//! with the chosen style's prompt, and has an image model render the result.

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod mime;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod styles;
pub mod upload;

pub use error::{Error, Result};
