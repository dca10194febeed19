use crate::domain::{acquisition::errors::ErrorKind, detection::entity::UploadResult};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};
use uuid::Uuid;

/// Handle to the bytes of one acquired image.
///
/// Camera captures land in a file the application provisioned itself, so they
/// are referenced directly. Gallery picks hand back an indirect reference that
/// has to be opened as a stream and copied before it can be uploaded.
///
/// A reference is consumed by exactly one upload and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageReference {
    /// A local file written by the camera.
    File(PathBuf),

    /// A content reference (`file://` URI, bare path or `http(s)://` URL).
    Content(String),
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Content(uri) => write!(f, "{}", uri),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSource {
    Camera,
    Gallery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    Camera,
}

/// The single authoritative state of the acquisition flow.
///
/// # Lifecycle
/// 1. **Idle** - nothing in progress
/// 2. **AwaitingPermission** - camera requested, waiting on the permission prompt
/// 3. **Capturing** - camera or gallery picker is open
/// 4. **Uploading** - resolver and uploader are running off the UI task
/// 5. **Completed** / **Failed** - terminal for one acquisition; a new one may start
///
/// # Invariants
/// - At most one acquisition is `Uploading` at any time
/// - `Completed` never carries a stale result: a failed upload yields `Failed`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AcquisitionState {
    #[default]
    Idle,
    AwaitingPermission,
    Capturing {
        source: ImageSource,
    },
    Uploading {
        acquisition_id: Uuid,
        image: ImageReference,
    },
    Completed {
        image: ImageReference,
        result: UploadResult,
    },
    Failed {
        image: Option<ImageReference>,
        error: ErrorKind,
    },
}

impl AcquisitionState {
    /// Whether a new camera or gallery acquisition may begin from here.
    pub fn accepts_new_acquisition(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Completed { .. } | Self::Failed { .. }
        )
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading { .. })
    }

    /// The image currently shown to the user, if any.
    pub fn image(&self) -> Option<&ImageReference> {
        match self {
            Self::Uploading { image, .. } | Self::Completed { image, .. } => Some(image),
            Self::Failed { image, .. } => image.as_ref(),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&UploadResult> {
        match self {
            Self::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Short name used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingPermission => "awaiting_permission",
            Self::Capturing { .. } => "capturing",
            Self::Uploading { .. } => "uploading",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }
}
