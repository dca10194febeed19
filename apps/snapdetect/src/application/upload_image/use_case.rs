use crate::{
    application::upload_image::dto::UploadOutcome,
    domain::{
        acquisition::{entity::ImageReference, errors::ErrorKind},
        detection::entity::UploadResult,
    },
    infrastructure::{
        detection::traits::DetectionService, storage::image_resolver::ImageSourceResolver,
    },
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, info_span, instrument};
use uuid::Uuid;

/// Resolves an acquired image to a local file and uploads it for detection.
///
/// Resolution always finishes before the upload starts; if it fails, no
/// request is made.
pub struct UploadImageUseCase {
    resolver: ImageSourceResolver,
    detector: Arc<dyn DetectionService>,
}

impl UploadImageUseCase {
    pub fn new(resolver: ImageSourceResolver, detector: Arc<dyn DetectionService>) -> Self {
        Self { resolver, detector }
    }

    #[instrument(skip(self), fields(image = %image))]
    pub async fn execute(&self, image: &ImageReference) -> Result<UploadResult, ErrorKind> {
        let path = self.resolver.resolve(image).await?;
        let result = self.detector.detect(&path).await;

        match &result {
            Ok(r) => info!(label = %r.label, "Upload completed"),
            Err(e) => error!(error = %e, "Upload failed"),
        }
        result
    }

    /// Run [`execute`](Self::execute) on its own task and report the outcome on `outcomes`.
    ///
    /// The task is not cancellable. Exactly one outcome is sent per call, even
    /// when the upload task panics, so the acquisition never stays uploading.
    pub fn spawn(
        self: &Arc<Self>,
        acquisition_id: Uuid,
        image: ImageReference,
        outcomes: mpsc::UnboundedSender<UploadOutcome>,
    ) {
        let use_case = Arc::clone(self);
        let span = info_span!("upload_task", %acquisition_id);
        let upload = tokio::spawn(
            async move { use_case.execute(&image).await }.instrument(span.clone()),
        );

        tokio::spawn(
            async move {
                let result = upload.await.unwrap_or_else(|e| {
                    error!(error = %e, "Upload task aborted");
                    Err(ErrorKind::TransportError(format!("upload task aborted: {}", e)))
                });
                if outcomes
                    .send(UploadOutcome {
                        acquisition_id,
                        result,
                    })
                    .is_err()
                {
                    tracing::debug!("Outcome receiver dropped, discarding upload result");
                }
            }
            .instrument(span),
        );
    }
}
