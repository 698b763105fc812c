use std::sync::Arc;

use crate::descriptor::BuildDescriptor;

/// Errors that can occur when talking to an upstream provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("no builds published for version {0}")]
    NoBuilds(String),
}

/// An upstream that publishes versions and builds for one project.
///
/// One instance is built per configured project, so implementations carry the
/// project id themselves.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable label identifying this provider in logs.
    fn label(&self) -> &str;

    /// All version labels, in the order upstream returns them.
    async fn list_versions(&self) -> Result<Vec<String>, ProviderError>;

    /// Resolve the latest build of `version` and its downloadable files.
    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError>;
}

#[async_trait::async_trait]
impl<T: Provider + ?Sized> Provider for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn list_versions(&self) -> Result<Vec<String>, ProviderError> {
        (**self).list_versions().await
    }

    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError> {
        (**self).resolve_build(version).await
    }
}
