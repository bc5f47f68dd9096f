use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::Value;

use super::formatter::{self, ResponseShape};
use super::validation::{self, RequestFields};
use crate::error::ApiError;
use crate::models::{DescribeUpdateAck, ImageSource, LabelPatchAck};
use crate::server::AppState;

type JsonResult = Result<Json<Value>, ApiError>;

fn url_source(fields: &RequestFields) -> Result<ImageSource, ApiError> {
    validation::require_image_url(fields).map(ImageSource::Url)
}

/// Analyze an image via URL
#[utoipa::path(
    post,
    path = "/api/vision/analyze",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Analysis success"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn analyze(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.full_analysis(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Full)))
}

/// Analyze an uploaded image
#[utoipa::path(
    post,
    path = "/api/vision/analyze-upload",
    tag = "Vision Analysis",
    request_body(content = crate::models::ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Successful analysis"),
        (status = 400, description = "Missing image file", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn analyze_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> JsonResult {
    let mut multipart = multipart.map_err(|e| {
        log::debug!("Rejected upload: {}", e);
        ApiError::MissingUpload("Image file is required".to_string())
    })?;

    let upload = state.uploads.persist(&mut multipart).await?;
    let source = upload.open().await?;
    let result = state.gateway.full_analysis(source).await;
    upload.release().await;

    Ok(Json(formatter::format_result(result?, ResponseShape::Full)))
}

/// Tags detected in an image
#[utoipa::path(
    post,
    path = "/api/vision/tags",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Tags array"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn tags(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.tags_only(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Field("tags"))))
}

/// Detect objects in an image
#[utoipa::path(
    post,
    path = "/api/vision/objects",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Object detection result"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn objects(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.objects_only(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Full)))
}

/// Natural-language description of an image
#[utoipa::path(
    post,
    path = "/api/vision/describe",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Description result"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn describe(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.describe(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Full)))
}

/// Printed text (OCR) in an image
#[utoipa::path(
    post,
    path = "/api/vision/text",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "OCR result"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn text(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.text_only(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Full)))
}

/// Faces detected in an image
#[utoipa::path(
    post,
    path = "/api/vision/faces",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Faces array"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn faces(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.faces_only(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Field("faces"))))
}

/// Dominant colors of an image
#[utoipa::path(
    post,
    path = "/api/vision/colors",
    tag = "Vision Analysis",
    request_body = crate::models::ImageUrlBody,
    responses(
        (status = 200, description = "Color result"),
        (status = 400, description = "Missing or malformed imageUrl", body = crate::models::ErrorBody),
        (status = 500, description = "Vision backend failure", body = crate::models::ErrorBody)
    )
)]
pub async fn colors(State(state): State<AppState>, fields: RequestFields) -> JsonResult {
    let source = url_source(&fields)?;
    let result = state.gateway.colors_only(source).await?;
    Ok(Json(formatter::format_result(result, ResponseShape::Field("color"))))
}

/// Mock update of image description
#[utoipa::path(
    put,
    path = "/api/vision/describe",
    tag = "Vision Analysis",
    request_body = crate::models::DescribeUpdateBody,
    responses(
        (status = 200, description = "Description updated", body = crate::models::DescribeUpdateAck),
        (status = 400, description = "Bad request", body = crate::models::ErrorBody)
    )
)]
pub async fn update_description(fields: RequestFields) -> Result<Json<DescribeUpdateAck>, ApiError> {
    let update = validation::require_describe_update(&fields)?;
    Ok(Json(formatter::describe_update_ack(update)))
}

/// Partially update image label (mock)
#[utoipa::path(
    patch,
    path = "/api/vision/label",
    tag = "Vision Analysis",
    request_body = crate::models::LabelPatchBody,
    responses(
        (status = 200, description = "Partial label update success", body = crate::models::LabelPatchAck),
        (status = 400, description = "Missing fields", body = crate::models::ErrorBody)
    )
)]
pub async fn patch_label(fields: RequestFields) -> Result<Json<LabelPatchAck>, ApiError> {
    let patch = validation::require_label_patch(&fields)?;
    Ok(Json(formatter::label_patch_ack(patch)))
}
