use utoipa::openapi::{server::ServerBuilder, OpenApi as OpenApiDoc};
use utoipa::OpenApi;

use crate::handlers::{status, vision};
use crate::models::{
    DescribeUpdateAck, DescribeUpdateBody, ErrorBody, ImageUploadForm, ImageUrlBody, LabelPatchAck,
    LabelPatchBody, StatusResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Azure AI Image Analysis",
        version = "1.0.0",
        description = "Comprehensive API for Computer Vision Analysis"
    ),
    paths(
        vision::analyze,
        vision::analyze_upload,
        vision::tags,
        vision::objects,
        vision::describe,
        vision::text,
        vision::faces,
        vision::colors,
        vision::update_description,
        vision::patch_label,
        status::status,
    ),
    components(schemas(
        ImageUrlBody,
        ImageUploadForm,
        DescribeUpdateBody,
        DescribeUpdateAck,
        LabelPatchBody,
        LabelPatchAck,
        StatusResponse,
        ErrorBody,
    )),
    tags(
        (name = "Vision Analysis", description = "Image analysis backed by Azure Computer Vision"),
        (name = "Status", description = "Service health")
    )
)]
struct ApiDoc;

/// OpenAPI document with the public base URL as its only server.
pub fn openapi(public_base_url: &str) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![ServerBuilder::new()
        .url(public_base_url)
        .description(Some("Development server"))
        .build()]);
    doc
}
