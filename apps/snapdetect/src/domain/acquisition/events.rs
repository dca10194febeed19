use crate::domain::{acquisition::errors::ErrorKind, detection::entity::UploadResult};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionEvent {
    PermissionGranted,
    PermissionDenied,
    CaptureCancelled,
    /// The camera could not be used; no upload was started.
    CaptureFailed {
        error: ErrorKind,
    },
    UploadStarted {
        acquisition_id: Uuid,
    },
    UploadCompleted {
        acquisition_id: Uuid,
        result: UploadResult,
    },
    UploadFailed {
        acquisition_id: Uuid,
        error: ErrorKind,
    },
    ExitRequested,
    ExitCancelled,
    ExitConfirmed,
}
