use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, ImageSource};

/// Trait for image-analysis backends (Azure Computer Vision, test doubles, ...)
#[async_trait::async_trait]
pub trait VisionBackend: Send + Sync {
    async fn analyze_image(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
    async fn detect_objects(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError>;
    async fn describe_image(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError>;
    async fn recognize_printed_text(
        &self,
        source: ImageSource,
        detect_orientation: bool,
    ) -> Result<AnalysisResult, AnalysisError>;
}
