use crate::{
    domain::acquisition::entity::{ImageReference, Permission},
    infrastructure::device::traits::{GalleryPicker, PermissionGate},
};
use async_trait::async_trait;
use std::{
    collections::HashSet,
    io::{self, Write},
    path::Path,
    sync::{Arc, Mutex as StdMutex},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin},
    sync::Mutex,
};

/// Line-oriented user input shared by the command loop and the prompts.
///
/// Only one reader holds the lines at a time; `next_line` is cancel safe, so
/// the command loop may race it against other events.
pub struct Console<R = Stdin> {
    input: Arc<Mutex<Lines<BufReader<R>>>>,
}

impl<R> Clone for Console<R> {
    fn clone(&self) -> Self {
        Self {
            input: Arc::clone(&self.input),
        }
    }
}

impl Console<Stdin> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin + Send> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: Arc::new(Mutex::new(BufReader::new(reader).lines())),
        }
    }

    /// Next trimmed input line; `None` at end of input.
    pub async fn next_line(&self) -> io::Result<Option<String>> {
        let line = self.input.lock().await.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    pub async fn prompt(&self, question: &str) -> io::Result<Option<String>> {
        print!("{} ", question);
        io::stdout().flush()?;
        self.next_line().await
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Permission prompt answered on the console. Grants last for the session.
pub struct ConsolePermissionGate<R = Stdin> {
    console: Console<R>,
    granted: StdMutex<HashSet<Permission>>,
}

impl<R: AsyncRead + Unpin + Send> ConsolePermissionGate<R> {
    pub fn new(console: Console<R>, camera_pre_granted: bool) -> Self {
        let mut granted = HashSet::new();
        if camera_pre_granted {
            granted.insert(Permission::Camera);
        }
        Self {
            console,
            granted: StdMutex::new(granted),
        }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> PermissionGate for ConsolePermissionGate<R> {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted
            .lock()
            .map(|g| g.contains(&permission))
            .unwrap_or(false)
    }

    async fn request(&self, permission: Permission) -> bool {
        let question = match permission {
            Permission::Camera => "Allow camera access? [y/N]",
        };
        let granted = match self.console.prompt(question).await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Permission prompt failed: {}", e);
                false
            }
        };
        if granted {
            if let Ok(mut set) = self.granted.lock() {
                set.insert(permission);
            }
        }
        granted
    }
}

/// Gallery stand-in: the user types a local path, `file://` URI or image URL.
///
/// Local files must look like images (by extension), mirroring an `image/*`
/// picker filter.
pub struct ConsoleGalleryPicker<R = Stdin> {
    console: Console<R>,
}

impl<R: AsyncRead + Unpin + Send> ConsoleGalleryPicker<R> {
    pub fn new(console: Console<R>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send + 'static> GalleryPicker for ConsoleGalleryPicker<R> {
    async fn pick(&self) -> anyhow::Result<Option<ImageReference>> {
        let Some(answer) = self
            .console
            .prompt("Image path or URL (empty to cancel):")
            .await?
        else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(None);
        }

        if answer.starts_with("http://") || answer.starts_with("https://") {
            return Ok(Some(ImageReference::Content(answer)));
        }

        let local = Path::new(answer.strip_prefix("file://").unwrap_or(&answer));
        if !local.is_file() {
            anyhow::bail!("{} is not a file", local.display());
        }
        if image::ImageFormat::from_path(local).is_err() {
            anyhow::bail!("{} is not an image", local.display());
        }
        Ok(Some(ImageReference::Content(answer)))
    }
}
