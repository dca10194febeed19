use crate::domain::acquisition::entity::{AcquisitionState, ImageReference, ImageSource};
use std::{path::Path, str::FromStr};

pub const APP_TITLE: &str = "Object Detection";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Dashboard,
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "homepage" => Ok(Self::Home),
            "dashboard" | "dashboardpage" => Ok(Self::Dashboard),
            other => Err(format!("unknown screen: {}", other)),
        }
    }
}

/// Everything that differs between the two routes.
///
/// Both routes show the same acquisition screen; only the quit button and
/// its confirmation dialog are worded differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    pub route: Route,
    pub quit_label: &'static str,
    pub dialog_title: &'static str,
    pub dialog_text: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
}

impl ScreenConfig {
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Home => Self {
                route,
                quit_label: "Back",
                dialog_title: "Confirm Exit",
                dialog_text: "Are you sure you want to exit?",
                confirm_label: "Exit",
                cancel_label: "Cancel",
            },
            Route::Dashboard => Self {
                route,
                quit_label: "Quit",
                dialog_title: "Quit",
                dialog_text: "Are you sure?",
                confirm_label: "OK",
                cancel_label: "Cancel",
            },
        }
    }

    /// Whether a dialog answer confirms the exit.
    pub fn confirms(&self, answer: &str) -> bool {
        let answer = answer.trim();
        answer.eq_ignore_ascii_case(self.confirm_label)
            || answer.eq_ignore_ascii_case("y")
            || answer.eq_ignore_ascii_case("yes")
    }
}

/// Current route; the state machine is shared across routes.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self { current: start }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    pub fn navigate(&mut self, route: Route) -> bool {
        let changed = self.current != route;
        self.current = route;
        changed
    }

    pub fn screen(&self) -> AcquisitionScreen {
        AcquisitionScreen::new(ScreenConfig::for_route(self.current))
    }
}

pub struct AcquisitionScreen {
    config: ScreenConfig,
}

impl AcquisitionScreen {
    pub fn new(config: ScreenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn render(&self, state: &AcquisitionState) -> String {
        let mut lines = vec![
            format!("==== {} ====", APP_TITLE),
            format!("[{}]", self.config.quit_label),
        ];

        lines.push(match state.image() {
            Some(image) => format!("Image: {}{}", image, dimensions(image)),
            None => "No image yet".to_string(),
        });

        let status = match state {
            AcquisitionState::Idle => None,
            AcquisitionState::AwaitingPermission => Some("Waiting for camera permission".into()),
            AcquisitionState::Capturing {
                source: ImageSource::Camera,
            } => Some("Taking picture...".into()),
            AcquisitionState::Capturing {
                source: ImageSource::Gallery,
            } => Some("Choosing image...".into()),
            AcquisitionState::Uploading { .. } => Some("Detecting...".into()),
            AcquisitionState::Completed { result, .. } => {
                Some(format!("Detected: {}", result.label))
            }
            AcquisitionState::Failed { .. } => Some("Detection failed".to_string()),
        };
        lines.extend(status);

        // Entry 0 is the one behind the label.
        if let Some(result) = state.result() {
            lines.extend(result.detections.iter().skip(1).map(|detection| {
                let class = detection.class_name.as_deref().unwrap_or("?");
                match detection.confidence {
                    Some(c) => format!("  also: {} ({:.0}%)", class, c * 100.0),
                    None => format!("  also: {}", class),
                }
            }));
        }

        lines.push(format!(
            "Commands: camera | gallery | {} | {} | status | help",
            match self.config.route {
                Route::Home => "dashboard",
                Route::Dashboard => "home",
            },
            self.config.quit_label.to_ascii_lowercase(),
        ));
        lines.join("\n")
    }

    pub fn render_dialog(&self) -> String {
        format!(
            "{}\n{}\n[{}] [{}]",
            self.config.dialog_title,
            self.config.dialog_text,
            self.config.confirm_label,
            self.config.cancel_label
        )
    }
}

/// ` (WxH)` for images readable from the local filesystem.
fn dimensions(image: &ImageReference) -> String {
    let path = match image {
        ImageReference::File(path) => path.as_path(),
        ImageReference::Content(uri) if !uri.contains("://") => Path::new(uri),
        ImageReference::Content(uri) => match uri.strip_prefix("file://") {
            Some(path) => Path::new(path),
            None => return String::new(),
        },
    };
    image::image_dimensions(path)
        .map(|(w, h)| format!(" ({}x{})", w, h))
        .unwrap_or_default()
}
