use std::sync::Arc;

use super::VisionBackend;
use crate::error::AnalysisError;
use crate::models::{AnalysisRequest, AnalysisResult, FeatureKind, ImageSource};

/// Visual features requested by the full-analysis endpoints, `Landmarks` as a detail.
pub const FULL_ANALYSIS_FEATURES: [FeatureKind; 10] = [
    FeatureKind::ImageType,
    FeatureKind::Faces,
    FeatureKind::Adult,
    FeatureKind::Categories,
    FeatureKind::Colors,
    FeatureKind::Tags,
    FeatureKind::Description,
    FeatureKind::Objects,
    FeatureKind::Brands,
    FeatureKind::Landmarks,
];

/// Single integration point with the vision backend: one outbound call per operation,
/// no retries, no caching.
pub struct AnalysisGateway {
    backend: Arc<dyn VisionBackend>,
}

impl AnalysisGateway {
    pub fn new(backend: Arc<dyn VisionBackend>) -> Self {
        Self { backend }
    }

    async fn analyze(
        &self,
        source: ImageSource,
        features: impl IntoIterator<Item = FeatureKind>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalysisRequest::new(source, features);
        log::info!(
            "🔍 Analyzing {} image: features={:?}",
            request.source.kind(),
            request.features
        );
        self.backend.analyze_image(request).await
    }

    pub async fn full_analysis(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(source, FULL_ANALYSIS_FEATURES).await
    }

    pub async fn tags_only(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(source, [FeatureKind::Tags]).await
    }

    pub async fn faces_only(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(source, [FeatureKind::Faces]).await
    }

    pub async fn colors_only(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        self.analyze(source, [FeatureKind::Colors]).await
    }

    pub async fn objects_only(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        log::info!("📦 Detecting objects in {} image", source.kind());
        self.backend.detect_objects(source).await
    }

    pub async fn describe(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        log::info!("📝 Describing {} image", source.kind());
        self.backend.describe_image(source).await
    }

    pub async fn text_only(&self, source: ImageSource) -> Result<AnalysisResult, AnalysisError> {
        log::info!("🔤 Recognizing printed text in {} image", source.kind());
        self.backend.recognize_printed_text(source, false).await
    }
}
