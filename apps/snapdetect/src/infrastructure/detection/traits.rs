use crate::domain::{acquisition::errors::ErrorKind, detection::entity::UploadResult};
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectionService: Send + Sync {
    /// Upload one local image file and return the detected label.
    async fn detect(&self, image_path: &Path) -> Result<UploadResult, ErrorKind>;
}
