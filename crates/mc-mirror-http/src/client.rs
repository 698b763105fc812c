use std::time::Duration;

use mc_mirror::ProviderError;
use serde::de::DeserializeOwned;

/// Sent with every request.
pub const USER_AGENT: &str = "mc-mirror";

/// Timeouts shared by the metadata clients and the downloader.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Budget for connecting and for each metadata (JSON) request.
    pub metadata_timeout: Duration,
    /// Budget for a whole streamed file download.
    pub download_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            metadata_timeout: Duration::from_secs(10),
            download_timeout: Duration::from_secs(600),
        }
    }
}

pub(crate) fn build_client(config: &HttpConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(config.metadata_timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not configure HTTP client, using defaults");
            reqwest::Client::new()
        })
}

/// Thin GET-and-decode helper for upstream JSON APIs.
///
/// Transport errors, non-success statuses and shape mismatches all come back
/// as `ProviderError`; nothing is retried.
pub(crate) struct JsonClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl JsonClient {
    pub(crate) fn new(config: &HttpConfig) -> Self {
        Self {
            client: build_client(config),
            timeout: config.metadata_timeout,
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(format!("{url}: {e}")))
    }
}

/// Strip trailing slashes so paths can be joined with `format!`.
pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_owned()
}
