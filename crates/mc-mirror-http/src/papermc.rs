use mc_mirror::{BuildDescriptor, BuildId, FileDescriptor, Provider, ProviderError};
use serde::Deserialize;

use crate::client::{HttpConfig, JsonClient, trim_base};

pub const DEFAULT_API_BASE: &str = "https://api.papermc.io/v2/projects";

/// `GET {base}/{project}`
#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

/// `GET {base}/{project}/versions/{version}`
#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: Vec<u64>,
}

/// `GET {base}/{project}/versions/{version}/builds/{build}`
///
/// `downloads` is kept as a raw map so upstream key order survives.
#[derive(Debug, Deserialize)]
struct BuildResponse {
    downloads: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct DownloadEntry {
    name: String,
    sha256: String,
}

/// Projects served by the PaperMC v2 API (paper, velocity, waterfall, ...).
///
/// Builds are append-ordered upstream, so the last one listed is the newest.
/// Every download carries a SHA-256.
pub struct PaperMcProvider {
    label: String,
    project: String,
    api_base_url: String,
    client: JsonClient,
}

impl PaperMcProvider {
    pub fn new(project: &str, api_base_url: Option<&str>, config: &HttpConfig) -> Self {
        Self {
            label: format!("papermc/{project}"),
            project: project.to_owned(),
            api_base_url: trim_base(api_base_url.unwrap_or(DEFAULT_API_BASE)),
            client: JsonClient::new(config),
        }
    }

    fn version_url(&self, version: &str) -> String {
        format!("{}/{}/versions/{}", self.api_base_url, self.project, version)
    }

    fn build_url(&self, version: &str, build: u64) -> String {
        format!("{}/builds/{}", self.version_url(version), build)
    }
}

#[async_trait::async_trait]
impl Provider for PaperMcProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_versions(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/{}", self.api_base_url, self.project);
        let response: ProjectResponse = self.client.get(&url).await?;
        Ok(response.versions)
    }

    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError> {
        let builds: VersionResponse = self.client.get(&self.version_url(version)).await?;
        let latest = *builds
            .builds
            .last()
            .ok_or_else(|| ProviderError::NoBuilds(version.to_owned()))?;

        let build_url = self.build_url(version, latest);
        let detail: BuildResponse = self.client.get(&build_url).await?;

        let files = detail
            .downloads
            .into_iter()
            .map(|(kind, value)| {
                let entry: DownloadEntry = serde_json::from_value(value).map_err(|e| {
                    ProviderError::Parse(format!("download entry {kind:?} in {build_url}: {e}"))
                })?;
                Ok(FileDescriptor {
                    download_url: format!("{build_url}/downloads/{}", entry.name),
                    kind,
                    name: entry.name,
                    sha256: Some(entry.sha256),
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Ok(BuildDescriptor {
            version: version.to_owned(),
            build: BuildId::Number(latest),
            files,
        })
    }
}
