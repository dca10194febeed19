use snapdetect::{
    domain::{
        acquisition::{
            entity::{AcquisitionState, ImageReference, ImageSource},
            errors::ErrorKind,
        },
        detection::entity::{DetectedLabel, UNKNOWN_LABEL, UploadResult},
    },
    presentation::terminal::screen::{Route, ScreenConfig},
};
use std::path::PathBuf;
use uuid::Uuid;

#[test]
fn label_is_taken_from_the_first_detection_only() {
    let result = UploadResult::from_response_body(
        br#"{"detections":[{"class":"person"},{"class":"bicycle","confidence":0.4}]}"#,
    );
    assert_eq!(result.label.as_str(), "person");
    assert_eq!(result.detections.len(), 2);
}

#[test]
fn odd_response_shapes_fall_back_to_unknown() {
    let bodies: [&[u8]; 6] = [
        b"",
        b"null",
        b"[]",
        br#"{"detections":{}}"#,
        br#"{"detections":[{"confidence":0.5}]}"#,
        br#"{"detections":[{"class":null}]}"#,
    ];
    for body in bodies {
        let result = UploadResult::from_response_body(body);
        assert_eq!(
            result.label,
            DetectedLabel::Unknown,
            "body: {}",
            String::from_utf8_lossy(body)
        );
    }
    assert_eq!(DetectedLabel::Unknown.to_string(), UNKNOWN_LABEL);
}

#[test]
fn numeric_class_is_shown_as_text() {
    let result = UploadResult::from_response_body(br#"{"detections":[{"class":7}]}"#);
    assert_eq!(result.label, DetectedLabel::Class("7".into()));
}

#[test]
fn new_acquisitions_are_refused_only_while_busy() {
    let image = ImageReference::File(PathBuf::from("/tmp/JPEG_x.jpg"));
    let completed = AcquisitionState::Completed {
        image: image.clone(),
        result: UploadResult::unknown(),
    };
    let failed = AcquisitionState::Failed {
        image: None,
        error: ErrorKind::PermissionDenied,
    };
    let uploading = AcquisitionState::Uploading {
        acquisition_id: Uuid::now_v7(),
        image: image.clone(),
    };

    assert!(AcquisitionState::Idle.accepts_new_acquisition());
    assert!(completed.accepts_new_acquisition());
    assert!(failed.accepts_new_acquisition());
    assert!(!uploading.accepts_new_acquisition());
    assert!(!AcquisitionState::AwaitingPermission.accepts_new_acquisition());
    assert!(
        !AcquisitionState::Capturing {
            source: ImageSource::Gallery
        }
        .accepts_new_acquisition()
    );

    assert!(uploading.is_uploading());
    assert_eq!(uploading.image(), Some(&image));
    assert!(uploading.result().is_none());
    assert_eq!(completed.result(), Some(&UploadResult::unknown()));
    assert!(failed.image().is_none());
}

#[test]
fn routes_parse_case_insensitively() {
    assert_eq!("Home".parse::<Route>(), Ok(Route::Home));
    assert_eq!(" dashboard ".parse::<Route>(), Ok(Route::Dashboard));
    assert!("settings".parse::<Route>().is_err());
}

#[test]
fn each_route_has_its_own_quit_wording() {
    let home = ScreenConfig::for_route(Route::Home);
    let dashboard = ScreenConfig::for_route(Route::Dashboard);

    assert_eq!(home.quit_label, "Back");
    assert_eq!(home.dialog_text, "Are you sure you want to exit?");
    assert_eq!(dashboard.quit_label, "Quit");
    assert_eq!(dashboard.dialog_text, "Are you sure?");

    assert!(home.confirms("exit"));
    assert!(!home.confirms("ok"));
    assert!(dashboard.confirms("OK"));
    assert!(!dashboard.confirms("cancel"));
}
