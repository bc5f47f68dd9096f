pub mod vision;
pub mod azure; // Azure Computer Vision REST client
pub mod gateway;
pub mod uploads; // Transient upload storage

pub use vision::VisionBackend;
pub use azure::AzureVisionClient;
pub use gateway::AnalysisGateway;
pub use uploads::UploadManager;
