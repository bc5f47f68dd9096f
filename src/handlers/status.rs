use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::models::StatusResponse;
use crate::server::AppState;

/// Check server status
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Status",
    responses((status = 200, description = "Server is running", body = StatusResponse))
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "✅ Server is up and running!".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to Azure AI Image Analysis API",
        "documentation": format!("{}/api-docs", state.public_base_url),
        "endpoints": {
            "analyze_url": "/api/vision/analyze",
            "analyze_upload": "/api/vision/analyze-upload",
            "tags": "/api/vision/tags",
            "objects": "/api/vision/objects",
            "describe": "/api/vision/describe",
            "text": "/api/vision/text",
            "faces": "/api/vision/faces",
            "colors": "/api/vision/colors",
            "update_description": "/api/vision/describe",
            "patch_label": "/api/vision/label",
            "status": "/api/status"
        }
    }))
}
