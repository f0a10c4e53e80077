//! Route handlers.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{get, post, web, HttpResponse};
use futures_util::TryStreamExt as _;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument as _};
use uuid::Uuid;

use super::{ApiResult, AppState};
use crate::models::{NewImage, NewTransformation, StyleId};
use crate::upload::{accept as accept_upload, check_size};
use crate::{styles, Error};

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "image";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_base64: String,
    pub original_name: String,
    pub image_id: u64,
}

/// Body of `POST /api/transform`. Both `style` and `imageBase64` are
/// required; they are optional here so a missing field is reported as a
/// 400 with a readable message.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub style: Option<String>,
    pub image_base64: Option<String>,
    pub image_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResponse {
    pub transformed_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation_id: Option<u64>,
}

fn malformed(err: MultipartError) -> Error {
    Error::InvalidUpload(format!("malformed multipart body: {}", err))
}

#[get("/api/styles")]
pub async fn list_styles() -> HttpResponse {
    HttpResponse::Ok().json(styles::list())
}

/// Read the `image` field, enforcing the size limit while streaming.
#[post("/api/upload")]
pub async fn upload(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> ApiResult<HttpResponse> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let declared_mime = field.content_type().map(|m| m.essence_str().to_string());
        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut raw = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            check_size(raw.len() + chunk.len())?;
            raw.extend_from_slice(&chunk);
        }

        let image_base64 = accept_upload(&raw, declared_mime.as_deref(), raw.len())?;
        let image = state
            .store
            .create_image(NewImage {
                original_filename: original_name.clone(),
                original_url: format!("upload:{}", Uuid::new_v4()),
                user_id: None,
            })
            .await?;
        info!(
            "Accepted upload '{}' ({} bytes) as image {}",
            original_name,
            raw.len(),
            image.id
        );

        return Ok(HttpResponse::Ok().json(UploadResponse {
            image_base64,
            original_name,
            image_id: image.id,
        }));
    }

    Err(Error::InvalidUpload("No image file provided".to_string()))
}

#[post("/api/transform")]
pub async fn transform(
    state: web::Data<AppState>,
    body: web::Json<TransformRequest>,
) -> ApiResult<HttpResponse> {
    let TransformRequest {
        style,
        image_base64,
        image_id,
    } = body.into_inner();

    let style: StyleId = style
        .ok_or_else(|| Error::InvalidRequest("style is required".to_string()))?
        .parse()?;
    let image_base64 = image_base64
        .filter(|data| !data.trim().is_empty())
        .ok_or_else(|| Error::InvalidRequest("imageBase64 is required".to_string()))?;

    let span = info_span!("transform", request_id = %Uuid::new_v4(), %style);
    let transformed_image_url = state
        .pipeline
        .transform_base64(&image_base64, style.as_str())
        .instrument(span)
        .await?;

    let transformation_id = match image_id {
        Some(image_id) => {
            let record = state
                .store
                .create_transformation(NewTransformation {
                    image_id,
                    style,
                    transformed_url: transformed_image_url.clone(),
                })
                .await?;
            Some(record.id)
        }
        None => None,
    };

    Ok(HttpResponse::Ok().json(TransformResponse {
        transformed_image_url,
        transformation_id,
    }))
}

#[get("/api/images/{id}")]
pub async fn get_image(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let image = state
        .store
        .get_image(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("image {}", id)))?;
    Ok(HttpResponse::Ok().json(image))
}

/// Transformation history for one image, oldest first. An image without
/// any transformations yields an empty list.
#[get("/api/images/{id}/transformations")]
pub async fn list_image_transformations(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let transformations = state
        .store
        .list_transformations_by_image(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transformations))
}

#[get("/api/transformations/{id}")]
pub async fn get_transformation(
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let transformation = state
        .store
        .get_transformation(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("transformation {}", id)))?;
    Ok(HttpResponse::Ok().json(transformation))
}
