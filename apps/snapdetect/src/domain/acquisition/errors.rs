use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single acquisition.
///
/// Every variant is recovered at the acquisition-flow boundary and shown to
/// the user as a notice; none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ErrorKind {
    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to resolve file: {0}")]
    ResolutionFailed(String),
    #[error("Server responded with status {0}")]
    ServerError(u16),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// A transition the state machine refused to take.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("An acquisition is already in progress ({state})")]
    Busy { state: &'static str },
    #[error("Cannot {action} while {state}")]
    Unexpected {
        action: &'static str,
        state: &'static str,
    },
}
