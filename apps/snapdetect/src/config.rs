//! Application configuration loading from environment variables.
//!
//! Configuration is read once at startup. A `.env` file in the working directory is
//! honoured by the binary (via `dotenvy`) before this module runs.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging filter (default: "info,snapdetect=debug")
//! - `DETECTION_BASE_URL`: Base URL of the detection service; `detect/` is appended
//!   (default: "http://192.168.43.168:8080/api/")
//! - `DETECTION_TIMEOUT_SECONDS`: Per-request timeout for uploads (default: 30)
//! - `IMAGE_CACHE_DIR`: Directory for provisioned image files
//!   (default: `<system temp dir>/snapdetect`)
//! - `CAMERA_COMMAND`: Capture command; `{output}` is replaced by the target file
//!   (default: "libcamera-still --nopreview -o {output}")
//! - `CAMERA_PERMISSION_GRANTED`: Treat camera permission as already granted (default: false)
//! - `START_SCREEN`: Initial route, `home` or `dashboard` (default: "home")

use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_DETECTION_BASE_URL: &str = "http://192.168.43.168:8080/api/";
pub const DEFAULT_CAMERA_COMMAND: &str = "libcamera-still --nopreview -o {output}";

/// Complete client configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the detection service (e.g., `http://10.0.0.2:8080/api/`)
    pub detection_base_url: String,

    /// Upper bound on a single upload request, in seconds
    pub detection_timeout_seconds: u64,

    /// Application-private directory where image files are provisioned
    pub image_cache_dir: PathBuf,

    /// Command line run to take a picture
    pub camera_command: String,

    /// Start the session with camera permission granted
    pub camera_permission_granted: bool,

    /// Route shown first
    pub start_screen: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            detection_base_url: env_or(
                "DETECTION_BASE_URL",
                DEFAULT_DETECTION_BASE_URL.to_string(),
            )?,
            detection_timeout_seconds: env_or("DETECTION_TIMEOUT_SECONDS", 30)?,
            image_cache_dir: env_optional("IMAGE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_dir),
            camera_command: env_or("CAMERA_COMMAND", DEFAULT_CAMERA_COMMAND.to_string())?,
            camera_permission_granted: env_or("CAMERA_PERMISSION_GRANTED", false)?,
            start_screen: env_or("START_SCREEN", "home".to_string())?,
        })
    }

    pub fn detection_timeout(&self) -> Duration {
        Duration::from_secs(self.detection_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection_base_url: DEFAULT_DETECTION_BASE_URL.to_string(),
            detection_timeout_seconds: 30,
            image_cache_dir: default_cache_dir(),
            camera_command: DEFAULT_CAMERA_COMMAND.to_string(),
            camera_permission_granted: false,
            start_screen: "home".to_string(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join("snapdetect")
}

/// Load an optional environment variable, treating empty values as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_optional(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        None => Ok(default),
    }
}
