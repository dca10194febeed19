use crate::domain::acquisition::entity::{ImageReference, Permission};
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Camera: Send + Sync {
    /// Take a picture into `target`.
    ///
    /// Returns `Ok(false)` when the user backed out without capturing.
    async fn capture(&self, target: &Path) -> anyhow::Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GalleryPicker: Send + Sync {
    /// Let the user choose an image; `None` means the picker was dismissed.
    async fn pick(&self) -> anyhow::Result<Option<ImageReference>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask the user for `permission`; resolves to whether it was granted.
    async fn request(&self, permission: Permission) -> bool;
}
