use chrono::Local;
use std::{io, path::PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

const MAX_ATTEMPTS: usize = 16;

/// Creates uniquely named image files in the application cache directory.
///
/// Names look like `JPEG_2026_10_19_17:58:03_5f2c9a01be.jpg`. The timestamp
/// only has second resolution, so a random suffix is appended and the file is
/// created with create-new semantics; a collision just draws another suffix.
#[derive(Debug, Clone)]
pub struct TempFileProvisioner {
    dir: PathBuf,
}

impl TempFileProvisioner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create an empty, writable image file and return its path.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures from creating the directory or the file.
    pub async fn create_image_file(&self) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let timestamp = Local::now().format("%Y_%m_%d_%H:%M:%S");
        for _ in 0..MAX_ATTEMPTS {
            let path = self
                .dir
                .join(format!("JPEG_{}_{}.jpg", timestamp, random_suffix()));

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => {
                    debug!(path = %path.display(), "Provisioned image file");
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "no unique image file name in {} after {} attempts",
                self.dir.display(),
                MAX_ATTEMPTS
            ),
        ))
    }
}

/// Ten hex digits from the random tail of a v7 UUID.
fn random_suffix() -> String {
    let simple = Uuid::now_v7().simple().to_string();
    simple[simple.len() - 10..].to_string()
}
