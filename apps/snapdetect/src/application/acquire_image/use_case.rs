use crate::{
    application::{
        acquire_image::{dto::Effect, state_machine::AcquisitionStateMachine},
        upload_image::{dto::UploadOutcome, use_case::UploadImageUseCase},
    },
    domain::acquisition::{
        entity::{AcquisitionState, ImageReference, Permission},
        errors::{ErrorKind, TransitionError},
        events::AcquisitionEvent,
    },
    infrastructure::{
        device::traits::{Camera, GalleryPicker, PermissionGate},
        storage::temp_files::TempFileProvisioner,
    },
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{error, info, instrument, warn};

/// Drives the acquisition flow: runs the state machine's effects against the
/// camera, gallery picker and permission gate, and hands captured images to
/// the upload pipeline on a background task.
///
/// Owned by the presentation task. Upload outcomes come back through the
/// receiver returned by [`new`](Self::new) and must be fed to
/// [`finish_upload`](Self::finish_upload) by that same task, so the state is
/// only ever mutated in one place.
pub struct AcquireImageUseCase {
    machine: AcquisitionStateMachine,
    camera: Arc<dyn Camera>,
    gallery: Arc<dyn GalleryPicker>,
    permissions: Arc<dyn PermissionGate>,
    provisioner: Arc<TempFileProvisioner>,
    uploader: Arc<UploadImageUseCase>,
    outcomes: mpsc::UnboundedSender<UploadOutcome>,
}

impl AcquireImageUseCase {
    pub fn new(
        camera: Arc<dyn Camera>,
        gallery: Arc<dyn GalleryPicker>,
        permissions: Arc<dyn PermissionGate>,
        provisioner: Arc<TempFileProvisioner>,
        uploader: Arc<UploadImageUseCase>,
    ) -> (Self, mpsc::UnboundedReceiver<UploadOutcome>) {
        let (outcomes, outcome_rx) = mpsc::unbounded_channel();
        let use_case = Self {
            machine: AcquisitionStateMachine::new(),
            camera,
            gallery,
            permissions,
            provisioner,
            uploader,
            outcomes,
        };
        (use_case, outcome_rx)
    }

    pub fn state(&self) -> AcquisitionState {
        self.machine.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AcquisitionState> {
        self.machine.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<AcquisitionEvent> {
        self.machine.events()
    }

    /// Take a picture, asking for camera permission first if needed.
    #[instrument(skip(self))]
    pub async fn capture_from_camera(&mut self) -> Result<(), TransitionError> {
        let granted = self.permissions.is_granted(Permission::Camera);
        let effect = self.machine.invoke_camera(granted)?;
        self.run(Some(effect)).await
    }

    /// Pick an existing image.
    #[instrument(skip(self))]
    pub async fn pick_from_gallery(&mut self) -> Result<(), TransitionError> {
        let effect = self.machine.invoke_gallery()?;
        self.run(Some(effect)).await
    }

    /// Apply an outcome received from an upload task.
    pub fn finish_upload(&mut self, outcome: UploadOutcome) -> bool {
        self.machine.upload_finished(outcome)
    }

    pub fn request_quit(&mut self) {
        self.machine.request_quit();
    }

    pub fn cancel_quit(&mut self) {
        self.machine.cancel_quit();
    }

    /// Returns `true` when the application should terminate.
    pub fn confirm_quit(&mut self) -> bool {
        matches!(self.machine.confirm_quit(), Some(Effect::Exit))
    }

    async fn run(&mut self, mut effect: Option<Effect>) -> Result<(), TransitionError> {
        while let Some(current) = effect.take() {
            effect = match current {
                Effect::RequestPermission(permission) => {
                    let granted = self.permissions.request(permission).await;
                    info!(?permission, granted, "Permission answered");
                    self.machine.permission_result(granted)?
                }
                Effect::LaunchCamera => self.launch_camera().await?,
                Effect::LaunchPicker => match self.gallery.pick().await {
                    Ok(picked) => self.machine.capture_finished(picked)?,
                    Err(e) => {
                        warn!("Gallery picker failed: {:#}", e);
                        self.machine.capture_finished(None)?
                    }
                },
                Effect::StartUpload {
                    acquisition_id,
                    image,
                } => {
                    self.uploader
                        .spawn(acquisition_id, image, self.outcomes.clone());
                    None
                }
                Effect::Exit => None,
            };
        }
        Ok(())
    }

    async fn launch_camera(&mut self) -> Result<Option<Effect>, TransitionError> {
        let target = match self.provisioner.create_image_file().await {
            Ok(path) => path,
            Err(e) => {
                error!("Could not provision capture file: {}", e);
                self.machine
                    .capture_failed(ErrorKind::CaptureFailed(format!(
                        "could not create image file: {}",
                        e
                    )))?;
                return Ok(None);
            }
        };

        match self.camera.capture(&target).await {
            Ok(true) => self
                .machine
                .capture_finished(Some(ImageReference::File(target))),
            Ok(false) => {
                // The provisioned file is left behind; cache cleanup is external.
                self.machine.capture_finished(None)
            }
            Err(e) => {
                error!("Camera failed: {:#}", e);
                self.machine
                    .capture_failed(ErrorKind::CaptureFailed(e.to_string()))?;
                Ok(None)
            }
        }
    }
}
