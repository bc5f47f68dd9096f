use anyhow::Result;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::time::Duration;
use tokio_util::io::ReaderStream;
use url::Url;

use super::VisionBackend;
use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, ImageSource};

const API_PREFIX: &str = "vision/v3.2";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Azure Computer Vision REST client
pub struct AzureVisionClient {
    api_key: String,
    endpoint: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl AzureVisionClient {
    pub fn new(api_key: String, endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            endpoint,
            timeout,
            client,
        })
    }

    fn api_url(&self, operation: &str, query: &[(&str, String)]) -> Result<Url, AnalysisError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}/{}", base, API_PREFIX, operation))
            .map_err(|e| AnalysisError::Transport(format!("Invalid vision endpoint: {}", e)))?;

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn post(&self, url: Url, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        log::debug!("📤 POST {} ({} source)", url.path(), source.kind());

        let request = self.client.post(url).header(KEY_HEADER, &self.api_key);
        let request = match source {
            ImageSource::Url(image_url) => {
                request.json(&serde_json::json!({ "url": image_url.as_str() }))
            }
            ImageSource::Stream(file) => {
                let len = file.metadata().await?.len();
                request
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .header(CONTENT_LENGTH, len)
                    .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            }
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout(self.timeout.as_secs())
            } else {
                AnalysisError::from(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("📥 Vision backend response status: {}", status);

        if !status.is_success() {
            let message = backend_error_message(status, &body);
            log::error!("❌ Vision backend error ({}): {}", status, message);
            return Err(AnalysisError::Backend(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            AnalysisError::Transport(format!("Vision backend returned invalid JSON: {}", e))
        })
    }
}

/// Pull the human-readable message out of an Azure error payload.
fn backend_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value["error"]["message"]
            .as_str()
            .or_else(|| value["message"].as_str())
            .map(str::to_string)
    });

    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Vision backend returned HTTP {}", status))
}

fn join_names(features: impl Iterator<Item = crate::models::FeatureKind>) -> String {
    features
        .map(|f| f.backend_name())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait::async_trait]
impl VisionBackend for AzureVisionClient {
    async fn analyze_image(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let mut query = vec![("visualFeatures", join_names(request.visual_features()))];
        let details = join_names(request.details());
        if !details.is_empty() {
            query.push(("details", details));
        }

        let url = self.api_url("analyze", &query)?;
        self.post(url, request.source).await
    }

    async fn detect_objects(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        let url = self.api_url("detect", &[])?;
        self.post(url, source).await
    }

    async fn describe_image(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        let url = self.api_url("describe", &[("maxCandidates", "1".to_string())])?;
        self.post(url, source).await
    }

    async fn recognize_printed_text(
        &self,
        source: ImageSource,
        detect_orientation: bool,
    ) -> Result<AnalysisResult, AnalysisError> {
        let url = self.api_url(
            "ocr",
            &[
                ("detectOrientation", detect_orientation.to_string()),
                ("language", "unk".to_string()),
            ],
        )?;
        self.post(url, source).await
    }
}
