use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorBody;

pub const DEFAULT_ANALYSIS_ERROR: &str = "An error occurred during image analysis";

/// Failure of the external vision backend. Every cause is terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Backend(String),
    #[error("{0}")]
    Transport(String),
    #[error("vision backend did not answer within {0} seconds")]
    Timeout(u64),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid URL format")]
    MalformedUrl,
    #[error("{0}")]
    MissingUpload(String),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedUrl | ApiError::MissingUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Analysis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut message = self.to_string();
        if message.trim().is_empty() {
            message = DEFAULT_ANALYSIS_ERROR.to_string();
        }

        if status.is_server_error() {
            log::error!("❌ Error: {:?}", self);
        } else {
            log::debug!("Rejected request: {}", message);
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
