use super::traits::Camera;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Camera backed by an external capture program such as `libcamera-still`.
///
/// The command line is split on whitespace and every `{output}` token is
/// replaced by the target path. A non-zero exit or an empty target counts as
/// the user cancelling the capture.
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(command_line: &str) -> anyhow::Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("Camera command is empty"))?;
        let args: Vec<String> = parts.collect();
        if !args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            anyhow::bail!("Camera command must contain {}", OUTPUT_PLACEHOLDER);
        }
        Ok(Self { program, args })
    }

    fn args_for(&self, target: &Path) -> Vec<String> {
        let target = target.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &target))
            .collect()
    }
}

#[async_trait]
impl Camera for CommandCamera {
    async fn capture(&self, target: &Path) -> anyhow::Result<bool> {
        let args = self.args_for(target);
        debug!(program = %self.program, ?args, "Launching camera");

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to launch {}: {}", self.program, e))?;

        if !status.success() {
            warn!(%status, "Camera exited without a picture");
            return Ok(false);
        }

        let written = tokio::fs::metadata(target)
            .await
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            info!(target = %target.display(), "Camera produced no image");
            return Ok(false);
        }

        Ok(true)
    }
}
