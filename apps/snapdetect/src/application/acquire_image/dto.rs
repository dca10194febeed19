use crate::domain::acquisition::entity::{ImageReference, Permission};
use uuid::Uuid;

/// Work a transition asks its caller to perform.
///
/// The state machine never touches devices, files or the network itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestPermission(Permission),
    LaunchCamera,
    LaunchPicker,
    StartUpload {
        acquisition_id: Uuid,
        image: ImageReference,
    },
    Exit,
}
