use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

pub type ContentStream = BoxStream<'static, std::io::Result<Bytes>>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Open a readable stream for an indirect content reference.
    async fn open(&self, uri: &str) -> anyhow::Result<ContentStream>;
}
