use super::{temp_files::TempFileProvisioner, traits::ContentSource};
use crate::domain::acquisition::{entity::ImageReference, errors::ErrorKind};
use futures_util::TryStreamExt;
use std::{path::PathBuf, sync::Arc};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

/// Materializes an [`ImageReference`] into a local file the uploader can read.
///
/// Camera files are used as they are. Content references are copied byte for
/// byte into a freshly provisioned file; those copies are never reused and are
/// left in the cache directory.
pub struct ImageSourceResolver {
    provisioner: Arc<TempFileProvisioner>,
    content: Arc<dyn ContentSource>,
}

impl ImageSourceResolver {
    pub fn new(provisioner: Arc<TempFileProvisioner>, content: Arc<dyn ContentSource>) -> Self {
        Self {
            provisioner,
            content,
        }
    }

    pub async fn resolve(&self, image: &ImageReference) -> Result<PathBuf, ErrorKind> {
        match image {
            ImageReference::File(path) => Ok(path.clone()),
            ImageReference::Content(uri) => self.copy_content(uri).await,
        }
    }

    async fn copy_content(&self, uri: &str) -> Result<PathBuf, ErrorKind> {
        let mut stream = self.content.open(uri).await.map_err(|e| {
            warn!(uri, "Failed to open content stream: {:#}", e);
            ErrorKind::ResolutionFailed(format!("cannot open {}: {}", uri, e))
        })?;

        let target = self.provisioner.create_image_file().await.map_err(|e| {
            warn!(uri, "Failed to provision image file: {}", e);
            ErrorKind::ResolutionFailed(format!("cannot create image file: {}", e))
        })?;

        let interrupted = |e: std::io::Error| {
            warn!(uri, target = %target.display(), "Content copy interrupted: {}", e);
            ErrorKind::ResolutionFailed(format!("copy of {} interrupted: {}", uri, e))
        };

        let mut file = fs::File::create(&target).await.map_err(interrupted)?;
        let mut copied = 0usize;
        while let Some(chunk) = stream.try_next().await.map_err(interrupted)? {
            file.write_all(&chunk).await.map_err(interrupted)?;
            copied += chunk.len();
        }
        file.flush().await.map_err(interrupted)?;

        debug!(uri, target = %target.display(), bytes = copied, "Resolved content reference");
        Ok(target)
    }
}
