use super::traits::DetectionService;
use crate::domain::{acquisition::errors::ErrorKind, detection::entity::UploadResult};
use async_trait::async_trait;
use reqwest::{
    Url,
    multipart::{Form, Part},
};
use std::{path::Path, time::Duration};
use tracing::{debug, instrument, warn};

pub const DETECT_PATH: &str = "detect/";
pub const IMAGE_FIELD: &str = "image";
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Multipart client for the remote detection endpoint.
///
/// Every call makes exactly one attempt; there is no retry policy.
pub struct HttpDetectionClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpDetectionClient {
    /// Build a client posting to `{base_url}/detect/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL or the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join(DETECT_PATH))
            .map_err(|e| anyhow::anyhow!("Invalid detection base URL {}: {}", base_url, e))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DetectionService for HttpDetectionClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint, path = %image_path.display()))]
    async fn detect(&self, image_path: &Path) -> Result<UploadResult, ErrorKind> {
        let is_file = tokio::fs::metadata(image_path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            warn!("Image file does not exist");
            return Err(ErrorKind::FileNotFound(image_path.to_path_buf()));
        }

        let data = tokio::fs::read(image_path)
            .await
            .map_err(|_| ErrorKind::FileNotFound(image_path.to_path_buf()))?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.jpg".to_string());
        debug!(bytes = data.len(), file_name = %file_name, "Uploading image");

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(IMAGE_CONTENT_TYPE)
            .map_err(transport_error)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            // The body only feeds the log line; a broken stream still reports the status.
            let reason = response
                .bytes()
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<serde_json::Value>(&body).ok())
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
            warn!(status = status.as_u16(), reason = ?reason, "Detection service rejected upload");
            return Err(ErrorKind::ServerError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        let result = UploadResult::from_response_body(&body);
        debug!(label = %result.label, detections = result.detections.len(), "Detection response parsed");
        Ok(result)
    }
}

/// Classify a transport failure for logging and wrap it as [`ErrorKind::TransportError`].
fn transport_error(err: reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        warn!(reqwest_timeout = %err);
    } else if err.is_connect() {
        warn!(reqwest_connect = %err);
    } else if err.is_request() {
        warn!(reqwest_request = %err);
    } else if err.is_body() || err.is_decode() {
        warn!(reqwest_body = %err);
    } else {
        warn!(reqwest_error = %err);
    }
    ErrorKind::TransportError(err.to_string())
}
