use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mc_mirror::{DownloadError, Downloader};

use crate::client::{HttpConfig, build_client};

const PROGRESS_STEP: u64 = 16 * 1024 * 1024;

/// Streams file bodies to disk chunk by chunk.
///
/// The body lands in `<name>.part` and is renamed over the destination only
/// once the transfer completes, so a broken transfer never leaves a short file
/// under the real name.
///
/// The whole transfer shares one timeout budget; a timeout fails the file and
/// is not retried.
pub struct HttpDownloader {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpDownloader {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: build_client(config),
            timeout: config.download_timeout,
        }
    }
}

#[async_trait::async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        tracing::info!(url, dest = %dest.display(), "downloading");

        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DownloadError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let total = response.content_length();
        let partial = partial_path(dest);

        let written = match stream_to(&mut response, &partial, url, total).await {
            Ok(written) => written,
            Err(e) => {
                let _ = std::fs::remove_file(&partial);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::rename(&partial, dest) {
            let _ = std::fs::remove_file(&partial);
            return Err(DownloadError::Io(format!("{}: {e}", dest.display())));
        }

        Ok(written)
    }
}

/// Sibling of `dest` the body is streamed into before it replaces `dest`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to(
    response: &mut reqwest::Response,
    path: &Path,
    url: &str,
    total: Option<u64>,
) -> Result<u64, DownloadError> {
    let io_err = |e: std::io::Error| DownloadError::Io(format!("{}: {e}", path.display()));
    let mut file = File::create(path).map_err(io_err)?;

    let mut written = 0u64;
    let mut next_report = PROGRESS_STEP;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DownloadError::Network(e.to_string()))?
    {
        file.write_all(&chunk).map_err(io_err)?;
        written += chunk.len() as u64;

        if written >= next_report {
            tracing::debug!(url, written, total = ?total, "download progress");
            next_report += PROGRESS_STEP;
        }
    }

    file.flush().map_err(io_err)?;
    Ok(written)
}
