use crate::domain::{acquisition::errors::ErrorKind, detection::entity::UploadResult};
use uuid::Uuid;

/// Result of one upload task, sent back to the task that owns the state.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub acquisition_id: Uuid,
    pub result: Result<UploadResult, ErrorKind>,
}
