//! Short user-facing notices, the terminal's equivalent of a toast.

use crate::domain::acquisition::{
    errors::{ErrorKind, TransitionError},
    events::AcquisitionEvent,
};

/// Notice for an acquisition error, without implementation details.
pub fn for_error(error: &ErrorKind) -> String {
    match error {
        ErrorKind::FileNotFound(_) => "File does not exist".into(),
        ErrorKind::ResolutionFailed(_) => "Failed to resolve file".into(),
        ErrorKind::ServerError(code) => format!("Failed to upload image: {}", code),
        ErrorKind::TransportError(message) => format!("Error: {}", message),
        ErrorKind::PermissionDenied => "Permission Denied".into(),
        ErrorKind::CaptureFailed(_) => "Camera unavailable".into(),
    }
}

pub fn for_transition(error: &TransitionError) -> String {
    match error {
        TransitionError::Busy { .. } => "Please wait for the current image to finish".into(),
        TransitionError::Unexpected { .. } => error.to_string(),
    }
}

/// Notice to show for an event; `None` when the screen itself says enough.
pub fn for_event(event: &AcquisitionEvent) -> Option<String> {
    match event {
        AcquisitionEvent::PermissionGranted => Some("Permission Granted".into()),
        AcquisitionEvent::PermissionDenied => Some("Permission Denied".into()),
        AcquisitionEvent::CaptureCancelled => Some("No image selected".into()),
        AcquisitionEvent::CaptureFailed { error }
        | AcquisitionEvent::UploadFailed { error, .. } => Some(for_error(error)),
        AcquisitionEvent::UploadStarted { .. }
        | AcquisitionEvent::UploadCompleted { .. }
        | AcquisitionEvent::ExitRequested
        | AcquisitionEvent::ExitCancelled
        | AcquisitionEvent::ExitConfirmed => None,
    }
}
