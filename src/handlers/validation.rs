use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;
use crate::models::{DescribeUpdateBody, LabelPatchBody};

/// Raw JSON request body as a field map. An empty body counts as `{}` so the
/// missing-field message is what the caller sees.
#[derive(Debug, Default)]
pub struct RequestFields(Map<String, Value>);

impl RequestFields {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(ApiError::Validation("Request body must be a JSON object".to_string())),
            Err(e) => Err(ApiError::Validation(format!("Invalid JSON body: {}", e))),
        }
    }

    /// A field counts as present unless it is absent, `null`, `false`, `0` or `""`.
    fn present(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| match value {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        })
    }

    fn present_value(&self, field: &str) -> Option<Value> {
        self.present(field).cloned()
    }
}

#[async_trait]
impl<S> FromRequest<S> for RequestFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read request body: {}", e)))?;
        Self::parse(&body)
    }
}

/// `imageUrl` must be present and parse as an absolute URL.
pub fn require_image_url(fields: &RequestFields) -> Result<Url, ApiError> {
    let value = fields
        .present("imageUrl")
        .ok_or_else(|| ApiError::Validation("Image URL is required".to_string()))?;

    let raw = value.as_str().ok_or(ApiError::MalformedUrl)?;
    Url::parse(raw).map_err(|_| ApiError::MalformedUrl)
}

pub fn require_describe_update(fields: &RequestFields) -> Result<DescribeUpdateBody, ApiError> {
    match (fields.present_value("imageUrl"), fields.present_value("newLabel")) {
        (Some(image_url), Some(new_label)) => Ok(DescribeUpdateBody { image_url, new_label }),
        _ => Err(ApiError::Validation(
            "Both imageUrl and newLabel are required.".to_string(),
        )),
    }
}

pub fn require_label_patch(fields: &RequestFields) -> Result<LabelPatchBody, ApiError> {
    match (fields.present_value("imageUrl"), fields.present_value("labelPatch")) {
        (Some(image_url), Some(label_patch)) => Ok(LabelPatchBody { image_url, label_patch }),
        _ => Err(ApiError::Validation(
            "imageUrl and labelPatch are required.".to_string(),
        )),
    }
}
