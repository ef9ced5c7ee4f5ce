//! Local-directory store for report images
//!
//! Names are never taken from the client: each accepted file is written as
//! `{uuid v4 simple}.{extension}` with the extension lowercased.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::UploadConfig;
use crate::core::error::AppError;
use crate::shared::constants::ALLOWED_IMAGE_EXTENSIONS;
use crate::shared::validation::is_valid_upload_filename;

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
}

pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Open the store, creating the upload directory if it is missing
    pub async fn new(config: UploadConfig) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.dir).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create upload directory '{}': {}",
                config.dir.display(),
                e
            ))
        })?;

        info!("Upload directory ready: {}", config.dir.display());

        Ok(Self { root: config.dir })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lowercased extension of `original_filename` if it is an allowed image type
    pub fn allowed_extension(original_filename: &str) -> Option<String> {
        // Browsers on some platforms send a full client path
        let base = original_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(original_filename);

        let (_, extension) = base.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();

        ALLOWED_IMAGE_EXTENSIONS
            .contains(&extension.as_str())
            .then_some(extension)
    }

    /// Store an uploaded image.
    ///
    /// Returns `Ok(None)` when the extension is not allowed; the caller
    /// carries on without an image.
    pub async fn store(&self, file: &UploadedFile) -> Result<Option<String>, AppError> {
        let Some(extension) = Self::allowed_extension(&file.filename) else {
            debug!(
                "Rejected upload '{}': extension not allowed",
                file.filename
            );
            return Ok(None);
        };

        let filename = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, &file.data).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to write upload '{}': {}",
                path.display(),
                e
            ))
        })?;

        info!(
            "Stored upload: original={}, stored={}, size={}",
            file.filename,
            filename,
            file.data.len()
        );

        Ok(Some(filename))
    }

    /// Remove a stored image. Failures are logged, never returned.
    pub async fn delete(&self, filename: &str) {
        if !is_valid_upload_filename(filename) {
            warn!("Refusing to delete unexpected upload name '{}'", filename);
            return;
        }

        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => info!("Deleted upload: {}", filename),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Upload already gone: {}", filename)
            }
            Err(e) => warn!("Failed to delete upload {}: {}", filename, e),
        }
    }

    /// Read a stored image, `Ok(None)` if the name is unknown
    pub async fn read(&self, filename: &str) -> Result<Option<Vec<u8>>, AppError> {
        if !is_valid_upload_filename(filename) {
            return Ok(None);
        }

        match tokio::fs::read(self.root.join(filename)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read upload {}: {}",
                filename, e
            ))),
        }
    }

    pub fn exists(&self, filename: &str) -> bool {
        is_valid_upload_filename(filename) && self.root.join(filename).is_file()
    }

    /// MIME type for a stored image name
    pub fn content_type(filename: &str) -> &'static str {
        match filename.rsplit_once('.').map(|(_, ext)| ext) {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        }
    }
}
