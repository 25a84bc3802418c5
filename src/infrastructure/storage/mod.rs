//! Local photo storage
//!
//! Uploaded photos are written under the configured upload directory:
//!
//! ```text
//! <upload_dir>/checklists/damage_<job>_<ts>_<random>.<ext>
//! <upload_dir>/deliveries/before_<job>_<ts>.<ext>
//! <upload_dir>/deliveries/after_<job>_<ts>.<ext>
//! ```
//!
//! The path recorded on the wash job uses the public prefix instead of the
//! upload directory so it can be served under `/static/uploads`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::config::StorageSettings;
use crate::domain::services::{PhotoStorage, PhotoUpload};
use crate::domain::value_objects::PhotoKind;
use crate::shared::error::AppError;

const DEFAULT_EXTENSION: &str = "jpg";
const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "heic"];

/// Writes photos to the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalPhotoStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.upload_dir.clone(), settings.public_prefix.clone())
    }

    /// Create the upload sub-directories.
    pub async fn ensure_directories(&self) -> Result<(), AppError> {
        for kind in [PhotoKind::Damage, PhotoKind::Before] {
            tokio::fs::create_dir_all(self.root.join(kind.directory())).await?;
        }
        Ok(())
    }

    fn file_name(job_id: i64, kind: PhotoKind, original: &str) -> String {
        let timestamp = Utc::now().timestamp();
        let extension = extension_of(original);
        match kind {
            // Several damage photos arrive in one request
            PhotoKind::Damage => {
                let random = Uuid::new_v4().simple().to_string();
                format!("{}_{}_{}_{}.{}", kind.prefix(), job_id, timestamp, &random[..8], extension)
            }
            PhotoKind::Before | PhotoKind::After => {
                format!("{}_{}_{}.{}", kind.prefix(), job_id, timestamp, extension)
            }
        }
    }
}

/// Lower-cased extension of an uploaded file name, restricted to image types.
fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn store(&self, job_id: i64, kind: PhotoKind, upload: &PhotoUpload) -> Result<String, AppError> {
        if upload.bytes.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Uploaded file {} is empty",
                upload.file_name
            )));
        }

        let directory = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&directory).await?;

        let file_name = Self::file_name(job_id, kind, &upload.file_name);
        tokio::fs::write(directory.join(&file_name), &upload.bytes).await?;

        tracing::debug!(job_id, kind = kind.prefix(), file = %file_name, "Photo stored");

        Ok(format!("{}/{}/{}", self.public_prefix, kind.directory(), file_name))
    }

    async fn discard(&self, public_path: &str) {
        let Some(path) = self.resolve(public_path) else {
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Photo discarded"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to discard photo"),
        }
    }

    /// Map a recorded public path back to a file under the upload root.
    ///
    /// Returns `None` for paths outside the public prefix or that try to
    /// escape the upload root.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let relative = public_path
            .trim_start_matches('/')
            .strip_prefix(self.public_prefix.trim_start_matches('/'))?
            .trim_start_matches('/');
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || relative.components().any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}
