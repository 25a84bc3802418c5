//! Photo storage port.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::value_objects::PhotoKind;
use crate::shared::error::AppError;

/// An uploaded image as received from the client.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    /// Client-side file name; only its extension is kept
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Persists uploaded photos and returns the path recorded on the wash job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn store(&self, job_id: i64, kind: PhotoKind, upload: &PhotoUpload) -> Result<String, AppError>;

    /// Remove a stored photo that ended up unreferenced. Failures are logged.
    async fn discard(&self, public_path: &str);

    /// File on disk behind a recorded path, `None` if it cannot be mapped.
    fn resolve(&self, public_path: &str) -> Option<PathBuf>;
}
