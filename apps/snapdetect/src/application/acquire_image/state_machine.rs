use crate::{
    application::{acquire_image::dto::Effect, upload_image::dto::UploadOutcome},
    domain::acquisition::{
        entity::{AcquisitionState, ImageReference, ImageSource, Permission},
        errors::{ErrorKind, TransitionError},
        events::AcquisitionEvent,
    },
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Owner of the authoritative [`AcquisitionState`].
///
/// State only changes through the transition methods below, which are meant
/// to be called from the task that owns the presentation. Observers follow
/// the state through [`subscribe`](Self::subscribe) and discrete happenings
/// (permission answers, cancellations, upload results) through
/// [`events`](Self::events).
pub struct AcquisitionStateMachine {
    state: watch::Sender<AcquisitionState>,
    events: broadcast::Sender<AcquisitionEvent>,
    exit_pending: bool,
}

impl Default for AcquisitionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl AcquisitionStateMachine {
    pub fn new() -> Self {
        let (state, _) = watch::channel(AcquisitionState::Idle);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state,
            events,
            exit_pending: false,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.state.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<AcquisitionEvent> {
        self.events.subscribe()
    }

    /// User pressed the camera button.
    pub fn invoke_camera(&mut self, permission_granted: bool) -> Result<Effect, TransitionError> {
        self.ensure_can_start()?;
        if permission_granted {
            self.set(AcquisitionState::Capturing {
                source: ImageSource::Camera,
            });
            Ok(Effect::LaunchCamera)
        } else {
            self.set(AcquisitionState::AwaitingPermission);
            Ok(Effect::RequestPermission(Permission::Camera))
        }
    }

    /// The permission prompt was answered.
    pub fn permission_result(&mut self, granted: bool) -> Result<Option<Effect>, TransitionError> {
        if !matches!(*self.state.borrow(), AcquisitionState::AwaitingPermission) {
            return Err(self.unexpected("answer a permission prompt"));
        }

        if granted {
            self.emit(AcquisitionEvent::PermissionGranted);
            self.set(AcquisitionState::Capturing {
                source: ImageSource::Camera,
            });
            Ok(Some(Effect::LaunchCamera))
        } else {
            self.emit(AcquisitionEvent::PermissionDenied);
            self.set(AcquisitionState::Idle);
            Ok(None)
        }
    }

    /// User pressed the gallery button.
    pub fn invoke_gallery(&mut self) -> Result<Effect, TransitionError> {
        self.ensure_can_start()?;
        self.set(AcquisitionState::Capturing {
            source: ImageSource::Gallery,
        });
        Ok(Effect::LaunchPicker)
    }

    /// The camera or picker closed; `None` means the user cancelled.
    pub fn capture_finished(
        &mut self,
        image: Option<ImageReference>,
    ) -> Result<Option<Effect>, TransitionError> {
        if !matches!(*self.state.borrow(), AcquisitionState::Capturing { .. }) {
            return Err(self.unexpected("finish a capture"));
        }

        match image {
            Some(image) => {
                let acquisition_id = Uuid::now_v7();
                self.emit(AcquisitionEvent::UploadStarted { acquisition_id });
                self.set(AcquisitionState::Uploading {
                    acquisition_id,
                    image: image.clone(),
                });
                Ok(Some(Effect::StartUpload {
                    acquisition_id,
                    image,
                }))
            }
            None => {
                self.emit(AcquisitionEvent::CaptureCancelled);
                self.set(AcquisitionState::Idle);
                Ok(None)
            }
        }
    }

    /// The camera could not be used at all.
    pub fn capture_failed(&mut self, error: ErrorKind) -> Result<(), TransitionError> {
        if !matches!(*self.state.borrow(), AcquisitionState::Capturing { .. }) {
            return Err(self.unexpected("fail a capture"));
        }
        self.emit(AcquisitionEvent::CaptureFailed {
            error: error.clone(),
        });
        self.set(AcquisitionState::Failed { image: None, error });
        Ok(())
    }

    /// Apply an upload result. Returns `false` when the outcome belongs to an
    /// acquisition that is no longer current and was ignored.
    pub fn upload_finished(&mut self, outcome: UploadOutcome) -> bool {
        let image = match &*self.state.borrow() {
            AcquisitionState::Uploading {
                acquisition_id,
                image,
            } if *acquisition_id == outcome.acquisition_id => image.clone(),
            other => {
                warn!(
                    acquisition_id = %outcome.acquisition_id,
                    state = other.name(),
                    "Ignoring stale upload outcome"
                );
                return false;
            }
        };

        let acquisition_id = outcome.acquisition_id;
        match outcome.result {
            Ok(result) => {
                self.emit(AcquisitionEvent::UploadCompleted {
                    acquisition_id,
                    result: result.clone(),
                });
                self.set(AcquisitionState::Completed { image, result });
            }
            Err(error) => {
                self.emit(AcquisitionEvent::UploadFailed {
                    acquisition_id,
                    error: error.clone(),
                });
                self.set(AcquisitionState::Failed {
                    image: Some(image),
                    error,
                });
            }
        }
        true
    }

    /// Open the exit confirmation. Allowed from any state.
    pub fn request_quit(&mut self) {
        self.exit_pending = true;
        self.emit(AcquisitionEvent::ExitRequested);
    }

    pub fn cancel_quit(&mut self) {
        if std::mem::take(&mut self.exit_pending) {
            self.emit(AcquisitionEvent::ExitCancelled);
        }
    }

    /// Confirm the exit prompt. Only yields [`Effect::Exit`] after [`request_quit`](Self::request_quit).
    pub fn confirm_quit(&mut self) -> Option<Effect> {
        if std::mem::take(&mut self.exit_pending) {
            self.emit(AcquisitionEvent::ExitConfirmed);
            Some(Effect::Exit)
        } else {
            None
        }
    }

    fn ensure_can_start(&self) -> Result<(), TransitionError> {
        let state = self.state.borrow();
        if state.accepts_new_acquisition() {
            Ok(())
        } else {
            Err(TransitionError::Busy {
                state: state.name(),
            })
        }
    }

    fn unexpected(&self, action: &'static str) -> TransitionError {
        TransitionError::Unexpected {
            action,
            state: self.state.borrow().name(),
        }
    }

    fn set(&mut self, next: AcquisitionState) {
        let previous = self.state.send_replace(next);
        debug!(
            from = previous.name(),
            to = self.state.borrow().name(),
            "Acquisition state changed"
        );
    }

    fn emit(&self, event: AcquisitionEvent) {
        let _ = self.events.send(event);
    }
}
