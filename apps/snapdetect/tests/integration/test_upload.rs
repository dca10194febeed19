use super::helpers::{
    CAT_RESPONSE, detection_client, spawn_detection_server, unreachable_base_url, write_jpeg,
};
use snapdetect::{
    domain::{
        acquisition::errors::ErrorKind,
        detection::entity::{DetectedLabel, UploadResult},
    },
    infrastructure::detection::traits::DetectionService,
};

#[tokio::test]
async fn upload_sends_exactly_one_image_part_with_file_bytes() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let dir = tempfile::tempdir().unwrap();
    let (path, bytes) = write_jpeg(dir.path(), "JPEG_2026_10_19_12:00:00_a1b2c3d4e5.jpg");

    let result = detection_client(&server.base_url)
        .detect(&path)
        .await
        .expect("upload failed");

    assert_eq!(result.label, DetectedLabel::Class("cat".into()));
    assert_eq!(result.detections[0].confidence, Some(0.93));

    let requests = server.requests();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    let parts = &requests[0];
    assert_eq!(parts.len(), 1, "expected a single multipart field");
    assert_eq!(parts[0].name, "image");
    assert_eq!(
        parts[0].file_name.as_deref(),
        Some("JPEG_2026_10_19_12:00:00_a1b2c3d4e5.jpg")
    );
    assert_eq!(parts[0].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(parts[0].data, bytes);
}

#[tokio::test]
async fn missing_file_fails_without_network_traffic() {
    let server = spawn_detection_server(200, CAT_RESPONSE, vec![]).await;
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never_written.jpg");

    let err = detection_client(&server.base_url)
        .detect(&missing)
        .await
        .unwrap_err();

    assert_eq!(err, ErrorKind::FileNotFound(missing));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn empty_missing_and_malformed_responses_are_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path(), "photo.jpg");

    for body in [r#"{"detections":[]}"#, "{}", "Internal gibberish <html>"] {
        let server = spawn_detection_server(200, body, vec![]).await;
        let result = detection_client(&server.base_url)
            .detect(&path)
            .await
            .expect("lenient parsing must not fail");
        assert_eq!(result, UploadResult::unknown(), "body: {}", body);
    }
}

#[tokio::test]
async fn server_error_status_is_reported_not_parsed() {
    let server = spawn_detection_server(500, CAT_RESPONSE, vec![]).await;
    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path(), "photo.jpg");

    let err = detection_client(&server.base_url)
        .detect(&path)
        .await
        .unwrap_err();
    assert_eq!(err, ErrorKind::ServerError(500));
    assert_eq!(server.requests().len(), 1, "no retry after a failure");
}

#[tokio::test]
async fn rejected_request_is_a_server_error() {
    let server = spawn_detection_server(400, r#"{"error":"Invalid request"}"#, vec![]).await;
    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path(), "photo.jpg");

    let err = detection_client(&server.base_url)
        .detect(&path)
        .await
        .unwrap_err();
    assert_eq!(err, ErrorKind::ServerError(400));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let base_url = unreachable_base_url().await;
    let dir = tempfile::tempdir().unwrap();
    let (path, _) = write_jpeg(dir.path(), "photo.jpg");

    let err = detection_client(&base_url).detect(&path).await.unwrap_err();
    assert!(
        matches!(err, ErrorKind::TransportError(_)),
        "unexpected error: {:?}",
        err
    );
}
