use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;
use utoipa::ToSchema;

/// One analysis dimension the vision backend can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    Tags,
    Faces,
    Objects,
    Colors,
    Description,
    Text,
    Categories,
    Adult,
    Brands,
    ImageType,
    Landmarks,
}

impl FeatureKind {
    /// Name used by the backend's `visualFeatures` / `details` query parameters.
    pub fn backend_name(&self) -> &'static str {
        match self {
            FeatureKind::Tags => "Tags",
            FeatureKind::Faces => "Faces",
            FeatureKind::Objects => "Objects",
            FeatureKind::Colors => "Color",
            FeatureKind::Description => "Description",
            FeatureKind::Text => "Text",
            FeatureKind::Categories => "Categories",
            FeatureKind::Adult => "Adult",
            FeatureKind::Brands => "Brands",
            FeatureKind::ImageType => "ImageType",
            FeatureKind::Landmarks => "Landmarks",
        }
    }

    /// Domain-specific models go in `details`, everything else in `visualFeatures`.
    pub fn is_detail(&self) -> bool {
        matches!(self, FeatureKind::Landmarks)
    }
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.backend_name())
    }
}

pub type FeatureSet = BTreeSet<FeatureKind>;

/// Where the image comes from: a public URL or a transient upload opened for reading.
#[derive(Debug)]
pub enum ImageSource {
    Url(Url),
    Stream(tokio::fs::File),
}

impl ImageSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::Url(_) => "url",
            ImageSource::Stream(_) => "stream",
        }
    }
}

/// A single outbound analysis call, scoped to one HTTP request.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub source: ImageSource,
    pub features: FeatureSet,
}

impl AnalysisRequest {
    pub fn new(source: ImageSource, features: impl IntoIterator<Item = FeatureKind>) -> Self {
        Self {
            source,
            features: features.into_iter().collect(),
        }
    }

    pub fn visual_features(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        self.features.iter().copied().filter(|f| !f.is_detail())
    }

    pub fn details(&self) -> impl Iterator<Item = FeatureKind> + '_ {
        self.features.iter().copied().filter(|f| f.is_detail())
    }
}

/// Opaque backend payload; only named subfields are ever picked out of it.
pub type AnalysisResult = serde_json::Value;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImageUrlBody {
    #[serde(rename = "imageUrl")]
    #[schema(example = "https://example.com/image.jpg")]
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DescribeUpdateBody {
    #[serde(rename = "imageUrl")]
    #[schema(value_type = String)]
    pub image_url: serde_json::Value,
    #[serde(rename = "newLabel")]
    #[schema(value_type = String)]
    pub new_label: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelPatchBody {
    #[serde(rename = "imageUrl")]
    #[schema(value_type = String)]
    pub image_url: serde_json::Value,
    #[serde(rename = "labelPatch")]
    #[schema(value_type = String)]
    pub label_patch: serde_json::Value,
}

#[allow(dead_code)] // documents the multipart form only
#[derive(ToSchema)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DescribeUpdateAck {
    pub message: String,
    #[serde(rename = "imageUrl")]
    #[schema(value_type = String)]
    pub image_url: serde_json::Value,
    #[serde(rename = "updatedLabel")]
    #[schema(value_type = String)]
    pub updated_label: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LabelPatchAck {
    pub message: String,
    #[serde(rename = "imageUrl")]
    #[schema(value_type = String)]
    pub image_url: serde_json::Value,
    #[serde(rename = "patchedLabel")]
    #[schema(value_type = String)]
    pub patched_label: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
