use super::helpers::{
    CAT_RESPONSE, spawn_detection_server, tiny_jpeg_bytes, upload_pipeline, write_jpeg,
};
use async_trait::async_trait;
use snapdetect::{
    application::acquire_image::use_case::AcquireImageUseCase,
    domain::{
        acquisition::{
            entity::{AcquisitionState, ImageReference, Permission},
            errors::ErrorKind,
            events::AcquisitionEvent,
        },
        detection::entity::DetectedLabel,
    },
    infrastructure::{
        device::traits::{Camera, GalleryPicker, PermissionGate},
        storage::temp_files::TempFileProvisioner,
    },
};
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

struct FixedGate(bool);

#[async_trait]
impl PermissionGate for FixedGate {
    fn is_granted(&self, _permission: Permission) -> bool {
        false
    }

    async fn request(&self, _permission: Permission) -> bool {
        self.0
    }
}

struct CountingCamera {
    frame: Vec<u8>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Camera for CountingCamera {
    async fn capture(&self, target: &Path) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(target, &self.frame).await?;
        Ok(true)
    }
}

struct FixedPicker(Option<ImageReference>);

#[async_trait]
impl GalleryPicker for FixedPicker {
    async fn pick(&self) -> anyhow::Result<Option<ImageReference>> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn gallery_url_is_copied_then_uploaded_byte_for_byte() {
    let media = tiny_jpeg_bytes();
    let server = spawn_detection_server(200, CAT_RESPONSE, media.clone()).await;
    let cache = tempfile::tempdir().unwrap();

    let result = upload_pipeline(&server.base_url, cache.path())
        .execute(&ImageReference::Content(server.media_url.clone()))
        .await
        .expect("pipeline failed");
    assert_eq!(result.label.as_str(), "cat");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0].data, media);
    let name = requests[0][0].file_name.clone().unwrap_or_default();
    assert!(name.starts_with("JPEG_") && name.ends_with(".jpg"), "{}", name);

    let copied: Vec<_> = std::fs::read_dir(cache.path()).unwrap().collect();
    assert_eq!(copied.len(), 1, "one temp file per gallery resolution");
}

#[tokio::test]
async fn local_gallery_file_is_copied_and_original_left_alone() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let pictures = tempfile::tempdir().unwrap();
    let cache = tempfile::tempdir().unwrap();
    let (original, bytes) = write_jpeg(pictures.path(), "holiday.jpg");

    let uri = format!("file://{}", original.display());
    upload_pipeline(&server.base_url, cache.path())
        .execute(&ImageReference::Content(uri))
        .await
        .expect("pipeline failed");

    let requests = server.requests();
    assert_eq!(requests[0][0].data, bytes);
    assert_ne!(requests[0][0].file_name.as_deref(), Some("holiday.jpg"));
    assert_eq!(std::fs::read(&original).unwrap(), bytes);
}

#[tokio::test]
async fn unresolvable_gallery_reference_never_reaches_the_service() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let cache = tempfile::tempdir().unwrap();

    let err = upload_pipeline(&server.base_url, cache.path())
        .execute(&ImageReference::Content("/no/such/picture.jpg".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, ErrorKind::ResolutionFailed(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn camera_capture_flows_through_to_a_detected_label() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let cache = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let frame = tiny_jpeg_bytes();

    let (mut acquisition, mut outcomes) = AcquireImageUseCase::new(
        Arc::new(CountingCamera {
            frame: frame.clone(),
            calls: calls.clone(),
        }),
        Arc::new(FixedPicker(None)),
        Arc::new(FixedGate(true)),
        Arc::new(TempFileProvisioner::new(cache.path())),
        upload_pipeline(&server.base_url, cache.path()),
    );
    let mut events = acquisition.events();

    acquisition.capture_from_camera().await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(10), outcomes.recv())
        .await
        .expect("upload timed out")
        .expect("outcome channel closed");
    assert!(acquisition.finish_upload(outcome));

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let state = acquisition.state();
    assert_eq!(
        state.result().map(|r| r.label.clone()),
        Some(DetectedLabel::Class("cat".into()))
    );
    let Some(ImageReference::File(captured)) = state.image() else {
        panic!("expected the captured file, got {:?}", state);
    };
    assert!(captured.starts_with(cache.path()));
    assert_eq!(server.requests()[0][0].data, frame);

    assert_eq!(events.recv().await.unwrap(), AcquisitionEvent::PermissionGranted);
    assert!(matches!(
        events.recv().await.unwrap(),
        AcquisitionEvent::UploadStarted { .. }
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        AcquisitionEvent::UploadCompleted { .. }
    ));
}

#[tokio::test]
async fn permission_denied_leaves_camera_untouched() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let cache = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let (mut acquisition, _outcomes) = AcquireImageUseCase::new(
        Arc::new(CountingCamera {
            frame: vec![],
            calls: calls.clone(),
        }),
        Arc::new(FixedPicker(None)),
        Arc::new(FixedGate(false)),
        Arc::new(TempFileProvisioner::new(cache.path())),
        upload_pipeline(&server.base_url, cache.path()),
    );

    acquisition.capture_from_camera().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(acquisition.state(), AcquisitionState::Idle);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn failed_upload_shows_no_stale_label() {
    let server = spawn_detection_server(500, "", vec![]).await;
    let cache = tempfile::tempdir().unwrap();
    let pictures = tempfile::tempdir().unwrap();
    let (photo, _) = write_jpeg(pictures.path(), "cat.jpg");

    let (mut acquisition, mut outcomes) = AcquireImageUseCase::new(
        Arc::new(CountingCamera {
            frame: vec![],
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        Arc::new(FixedPicker(Some(ImageReference::Content(
            photo.display().to_string(),
        )))),
        Arc::new(FixedGate(false)),
        Arc::new(TempFileProvisioner::new(cache.path())),
        upload_pipeline(&server.base_url, cache.path()),
    );

    acquisition.pick_from_gallery().await.unwrap();
    let outcome = outcomes.recv().await.unwrap();
    acquisition.finish_upload(outcome);

    let state = acquisition.state();
    assert!(state.result().is_none());
    assert!(matches!(
        state,
        AcquisitionState::Failed {
            error: ErrorKind::ServerError(500),
            image: Some(_)
        }
    ));
}
