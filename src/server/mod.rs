pub mod docs;

use axum::{
    extract::{DefaultBodyLimit, State},
    response::Html,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use utoipa::openapi::OpenApi as OpenApiDoc;

use crate::handlers::{status, vision};
use crate::services::{AnalysisGateway, UploadManager};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<AnalysisGateway>,
    pub uploads: Arc<UploadManager>,
    pub public_base_url: Arc<str>,
    pub openapi: Arc<OpenApiDoc>,
}

impl AppState {
    pub fn new(gateway: Arc<AnalysisGateway>, uploads: Arc<UploadManager>, public_base_url: &str) -> Self {
        Self {
            gateway,
            uploads,
            public_base_url: Arc::from(public_base_url),
            openapi: Arc::new(docs::openapi(public_base_url)),
        }
    }
}

pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(status::root))
        .route("/api/status", get(status::status))
        .route("/api/vision/analyze", post(vision::analyze))
        .route("/api/vision/analyze-upload", post(vision::analyze_upload))
        .route("/api/vision/tags", post(vision::tags))
        .route("/api/vision/objects", post(vision::objects))
        .route(
            "/api/vision/describe",
            post(vision::describe).put(vision::update_description),
        )
        .route("/api/vision/text", post(vision::text))
        .route("/api/vision/faces", post(vision::faces))
        .route("/api/vision/colors", post(vision::colors))
        .route("/api/vision/label", patch(vision::patch_label))
        .route("/api-docs", get(docs_page))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}

async fn docs_page() -> Html<&'static str> {
    Html(include_str!("../../static/api_docs.html"))
}

async fn openapi_json(State(state): State<AppState>) -> Json<OpenApiDoc> {
    Json(state.openapi.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gateway::testing::{Call, FakeBackend};
    use crate::services::VisionBackend;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "X-VISION-GATEWAY-BOUNDARY";

    struct Harness {
        app: Router,
        backend: Arc<FakeBackend>,
        upload_dir: tempfile::TempDir,
    }

    fn harness(backend: Arc<FakeBackend>) -> Harness {
        harness_with_limit(backend, 1024 * 1024)
    }

    fn harness_with_limit(backend: Arc<FakeBackend>, max_body_bytes: usize) -> Harness {
        let upload_dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(AnalysisGateway::new(backend.clone() as Arc<dyn VisionBackend>));
        let uploads = Arc::new(UploadManager::new(upload_dir.path().to_path_buf()));
        let state = AppState::new(gateway, uploads, "http://localhost:5000");

        Harness {
            app: create_router(state, max_body_bytes),
            backend,
            upload_dir,
        }
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"cat.jpg\"\r\n",
                field
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/vision/analyze-upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn upload_dir_is_empty(h: &Harness) -> bool {
        std::fs::read_dir(h.upload_dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_missing_image_url_never_reaches_backend() {
        let h = harness(FakeBackend::ok(json!({})));

        for uri in [
            "/api/vision/analyze",
            "/api/vision/tags",
            "/api/vision/objects",
            "/api/vision/describe",
            "/api/vision/text",
            "/api/vision/faces",
            "/api/vision/colors",
        ] {
            let (status, body) = send(&h.app, json_request(Method::POST, uri, json!({}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "Image URL is required", "{}", uri);
        }

        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_url_never_reaches_backend() {
        let h = harness(FakeBackend::ok(json!({})));

        let (status, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/tags", json!({ "imageUrl": "not-a-url" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid URL format");
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_body_reports_missing_field() {
        let h = harness(FakeBackend::ok(json!({})));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/vision/analyze")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Image URL is required");
    }

    #[tokio::test]
    async fn test_tags_returns_only_tags_field() {
        let tags = json!([{ "name": "cat", "confidence": 0.98 }]);
        let h = harness(FakeBackend::ok(json!({ "tags": tags, "requestId": "r-1" })));

        let (status, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/tags", json!({ "imageUrl": "https://example.com/cat.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, tags);
        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_faces_and_colors_return_their_fields() {
        let faces = json!([{ "age": 31, "gender": "Female" }]);
        let color = json!({ "dominantColorForeground": "Black", "isBwImg": false });
        let h = harness(FakeBackend::ok(json!({ "faces": faces, "color": color, "tags": [] })));

        let (_, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/faces", json!({ "imageUrl": "https://example.com/p.jpg" })),
        )
        .await;
        assert_eq!(body, faces);

        let (_, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/colors", json!({ "imageUrl": "https://example.com/p.jpg" })),
        )
        .await;
        assert_eq!(body, color);
    }

    #[tokio::test]
    async fn test_analyze_returns_full_object() {
        let result = json!({ "tags": [], "faces": [], "requestId": "r-2" });
        let h = harness(FakeBackend::ok(result.clone()));

        let (status, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/analyze", json!({ "imageUrl": "https://example.com/a.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, result);
    }

    #[tokio::test]
    async fn test_text_uses_printed_text_recognition() {
        let h = harness(FakeBackend::ok(json!({ "language": "en", "regions": [] })));

        let (status, _) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/text", json!({ "imageUrl": "https://example.com/sign.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(h.backend.calls(), vec![Call::Text { detect_orientation: false }]);
    }

    #[tokio::test]
    async fn test_backend_failure_maps_to_500() {
        let h = harness(FakeBackend::failing("getaddrinfo ENOTFOUND vision.example.com"));

        let (status, body) = send(
            &h.app,
            json_request(Method::POST, "/api/vision/objects", json!({ "imageUrl": "https://example.com/a.jpg" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "getaddrinfo ENOTFOUND vision.example.com" }));
    }

    #[tokio::test]
    async fn test_put_describe_is_a_mock_echo() {
        let h = harness(FakeBackend::ok(json!({})));

        let (status, body) = send(
            &h.app,
            json_request(
                Method::PUT,
                "/api/vision/describe",
                json!({ "imageUrl": "http://x/y.jpg", "newLabel": "cat" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imageUrl"], "http://x/y.jpg");
        assert_eq!(body["updatedLabel"], "cat");
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_patch_label_requires_label_patch() {
        let h = harness(FakeBackend::ok(json!({})));

        let (status, body) = send(
            &h.app,
            json_request(Method::PATCH, "/api/vision/label", json!({ "imageUrl": "http://x/y.jpg" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "imageUrl and labelPatch are required.");

        let (status, body) = send(
            &h.app,
            json_request(
                Method::PATCH,
                "/api/vision/label",
                json!({ "imageUrl": "http://x/y.jpg", "labelPatch": "tabby" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patchedLabel"], "tabby");

        let (status, body) = send(
            &h.app,
            json_request(
                Method::PATCH,
                "/api/vision/label",
                json!({ "imageUrl": "http://x/y.jpg", "labelPatch": { "color": "orange" } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patchedLabel"], json!({ "color": "orange" }));
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_is_streamed_and_removed_on_success() {
        let h = harness(FakeBackend::ok(json!({ "tags": [{ "name": "cat" }] })));

        let (status, body) = send(&h.app, multipart_request("image", b"\xFF\xD8fake-jpeg")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tags"][0]["name"], "cat");
        assert_eq!(h.backend.streamed_bytes(), b"\xFF\xD8fake-jpeg".to_vec());
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_upload_is_removed_on_backend_failure() {
        let h = harness(FakeBackend::failing("Input image is too large."));

        let (status, body) = send(&h.app, multipart_request("image", b"bytes")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Input image is too large.");
        assert_eq!(h.backend.call_count(), 1);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_upload_without_image_field_is_rejected() {
        let h = harness(FakeBackend::ok(json!({})));

        let (status, body) = send(&h.app, multipart_request("file", b"bytes")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Image file is required");

        let request = json_request(Method::POST, "/api/vision/analyze-upload", json!({}));
        let (status, _) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(h.backend.call_count(), 0);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_oversized_bodies_get_json_errors() {
        let h = harness_with_limit(FakeBackend::ok(json!({})), 1024);

        let label = "x".repeat(4096);
        let (status, body) = send(
            &h.app,
            json_request(
                Method::PATCH,
                "/api/vision/label",
                json!({ "imageUrl": "http://x/y.jpg", "labelPatch": label }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body["error"].as_str().unwrap().is_empty());

        let (status, body) = send(&h.app, multipart_request("image", &vec![0xAB; 4096])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body["error"].as_str().unwrap().is_empty());

        assert_eq!(h.backend.call_count(), 0);
        assert!(upload_dir_is_empty(&h));
    }

    #[tokio::test]
    async fn test_status_and_root() {
        let h = harness(FakeBackend::ok(json!({})));

        let request = Request::builder().uri("/api/status").body(Body::empty()).unwrap();
        let (status, body) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["status"].is_string());
        assert!(chrono::DateTime::parse_from_rfc3339(body["time"].as_str().unwrap()).is_ok());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (_, body) = send(&h.app, request).await;
        assert_eq!(body["documentation"], "http://localhost:5000/api-docs");
        assert_eq!(body["endpoints"]["analyze_upload"], "/api/vision/analyze-upload");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let h = harness(FakeBackend::ok(json!({})));

        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Azure AI Image Analysis");
        assert_eq!(body["servers"][0]["url"], "http://localhost:5000");
    }
}
