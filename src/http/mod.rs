//! HTTP surface
//!
//! ```text
//! GET  /api/styles
//! POST /api/upload
//! POST /api/transform
//! GET  /api/images/{id}
//! GET  /api/images/{id}/transformations
//! GET  /api/transformations/{id}
//! ```

mod error;
pub mod handlers;

pub use error::{ApiResult, ErrorBody};

use crate::pipeline::TransformationPipeline;
use crate::store::RecordStore;
use crate::Error;
use actix_web::web;
use std::sync::Arc;

/// JSON bodies carry base64 images, so they need room for a 5 MiB file.
pub const MAX_JSON_BYTES: usize = 8 * 1024 * 1024;

/// Dependencies shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TransformationPipeline>,
    pub store: Arc<dyn RecordStore>,
}

/// Register routes and extractor settings on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default()
        .limit(MAX_JSON_BYTES)
        .error_handler(|err, _req| Error::InvalidRequest(err.to_string()).into());
    let path = web::PathConfig::default()
        .error_handler(|err, _req| Error::InvalidRequest(err.to_string()).into());

    cfg.app_data(json)
        .app_data(path)
        .service(handlers::list_styles)
        .service(handlers::upload)
        .service(handlers::transform)
        .service(handlers::get_image)
        .service(handlers::list_image_transformations)
        .service(handlers::get_transformation);
}
