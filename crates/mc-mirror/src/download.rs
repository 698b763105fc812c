use std::path::Path;
use std::sync::Arc;

/// Errors that can occur while fetching a file body to disk.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(String),
}

/// Streams a remote file to a local path, overwriting it.
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` into `dest` and return the number of bytes written.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError>;
}

#[async_trait::async_trait]
impl<T: Downloader + ?Sized> Downloader for Arc<T> {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        (**self).download(url, dest).await
    }
}
