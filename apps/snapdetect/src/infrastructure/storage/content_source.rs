use super::traits::{ContentSource, ContentStream};
use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::{StreamExt, TryStreamExt, stream};
use std::{io, path::PathBuf, time::Duration};
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Opens gallery references: `file://` URIs, bare local paths and `http(s)://` URLs.
pub struct DefaultContentSource {
    client: reqwest::Client,
}

impl DefaultContentSource {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn open_remote(&self, url: &str) -> anyhow::Result<ContentStream> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes_stream().map_err(io::Error::other).boxed())
    }

    async fn open_local(&self, path: PathBuf) -> anyhow::Result<ContentStream> {
        let file = tokio::fs::File::open(&path).await?;
        let chunks = stream::try_unfold(file, |mut file| async move {
            let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
            let read = file.read_buf(&mut buf).await?;
            Ok::<_, io::Error>((read > 0).then(|| (buf.freeze(), file)))
        });
        Ok(chunks.boxed())
    }
}

#[async_trait]
impl ContentSource for DefaultContentSource {
    async fn open(&self, uri: &str) -> anyhow::Result<ContentStream> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            self.open_remote(uri).await
        } else {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            self.open_local(PathBuf::from(path)).await
        }
    }
}
