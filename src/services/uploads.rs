use anyhow::{Context, Result};
use axum::extract::Multipart;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::ImageSource;

/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "image";

/// Persists one uploaded image per request into transient storage.
pub struct UploadManager {
    dir: PathBuf,
}

impl UploadManager {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create the transient directory if it does not exist yet.
    pub async fn prepare(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.dir.display()))?;
        log::info!("📁 Upload directory ready: {}", self.dir.display());
        Ok(())
    }

    /// Write the `image` field to a uniquely named file. Other fields are skipped.
    pub async fn persist(&self, multipart: &mut Multipart) -> Result<TransientUpload, ApiError> {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                continue;
            }

            // Guard exists before the file so a failed write still cleans up.
            let mut upload = TransientUpload {
                path: self.dir.join(Uuid::new_v4().simple().to_string()),
                size: 0,
                released: false,
            };
            let mut file = tokio::fs::File::create(&upload.path)
                .await
                .map_err(|e| storage_error(&upload, e))?;

            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
            {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| storage_error(&upload, e))?;
                upload.size += chunk.len() as u64;
            }
            file.flush().await.map_err(|e| storage_error(&upload, e))?;
            drop(file);

            if upload.size == 0 {
                return Err(ApiError::MissingUpload("Uploaded image is empty".to_string()));
            }

            log::info!("💾 Stored upload ({} bytes)", upload.size);
            return Ok(upload);
        }

        Err(ApiError::MissingUpload("Image file is required".to_string()))
    }
}

fn storage_error(upload: &TransientUpload, err: std::io::Error) -> ApiError {
    log::error!("❌ Failed to write {}: {}", upload.path.display(), err);
    ApiError::Internal("Failed to store uploaded image".to_string())
}

/// An uploaded image on disk. Dropping it deletes the file.
#[derive(Debug)]
pub struct TransientUpload {
    path: PathBuf,
    size: u64,
    released: bool,
}

impl TransientUpload {
    /// Open the stored image as a stream for the backend.
    pub async fn open(&self) -> Result<ImageSource, ApiError> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            log::error!("❌ Failed to reopen {}: {}", self.path.display(), e);
            ApiError::Internal("Failed to read uploaded image".to_string())
        })?;
        Ok(ImageSource::Stream(file))
    }

    /// Delete the file without blocking the runtime thread.
    pub async fn release(mut self) {
        let result = tokio::fs::remove_file(&self.path).await;
        log_removal(&self.path, result);
        self.released = true;
    }
}

impl Drop for TransientUpload {
    // Covers early returns and cancellation. The sync remove blocks the runtime
    // thread for the duration of one unlink.
    fn drop(&mut self) {
        if !self.released {
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &std::path::Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => log::debug!("🗑️ Removed transient upload {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::error!("❌ Failed to remove transient upload {}: {}", path.display(), e),
    }
}
