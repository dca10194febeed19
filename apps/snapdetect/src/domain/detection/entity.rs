use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const UNKNOWN_LABEL: &str = "Unknown";

/// One classified object as reported by the detection service.
///
/// Every field is optional: the service contract only promises `class`, and
/// even that may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default, rename = "class")]
    pub class_name: Option<String>,

    #[serde(default)]
    pub confidence: Option<f32>,

    /// Bounding boxes in `xyxy` order, one row per box.
    #[serde(default, rename = "box")]
    pub bounding_box: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectedLabel {
    Class(String),
    Unknown,
}

impl DetectedLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class(name) => name,
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for DetectedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one completed upload.
///
/// The label is what the user sees; `detections` keeps everything the service
/// returned that could be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub label: DetectedLabel,
    pub detections: Vec<Detection>,
}

impl UploadResult {
    pub fn unknown() -> Self {
        Self {
            label: DetectedLabel::Unknown,
            detections: vec![],
        }
    }

    /// Parses a detection response body.
    ///
    /// Parsing is lenient: a body that is not JSON is read as `{}`, and any
    /// shape other than `{"detections": [{"class": ...}, ...]}` yields
    /// `Unknown` rather than an error.
    pub fn from_response_body(body: &[u8]) -> Self {
        let json: Value =
            serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));

        let Some(entries) = json.get("detections").and_then(Value::as_array) else {
            return Self::unknown();
        };

        let label = entries
            .first()
            .and_then(|first| first.get("class"))
            .and_then(class_text)
            .map(DetectedLabel::Class)
            .unwrap_or(DetectedLabel::Unknown);

        let detections = entries.iter().map(Detection::from_value).collect();

        Self { label, detections }
    }
}

impl Detection {
    /// Reads each field on its own so one malformed field never drops the
    /// entry. Entries stay index-aligned with the response array.
    fn from_value(entry: &Value) -> Self {
        Self {
            class_name: entry.get("class").and_then(class_text),
            confidence: entry
                .get("confidence")
                .and_then(Value::as_f64)
                .map(|c| c as f32),
            bounding_box: entry
                .get("box")
                .and_then(|b| serde_json::from_value(b.clone()).ok()),
        }
    }
}

fn class_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
