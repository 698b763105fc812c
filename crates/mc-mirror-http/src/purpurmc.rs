use mc_mirror::{BuildDescriptor, BuildId, FileDescriptor, Provider, ProviderError};
use serde::Deserialize;

use crate::client::{HttpConfig, JsonClient, trim_base};

pub const DEFAULT_API_BASE: &str = "https://api.purpurmc.org/v2";

/// `GET {base}/{project}`
#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

/// `GET {base}/{project}/{version}`
#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: BuildsField,
}

#[derive(Debug, Deserialize)]
struct BuildsField {
    latest: BuildId,
}

/// Projects served by the PurpurMC v2 API.
///
/// Upstream exposes a single "latest" build and no checksum, so the descriptor
/// always has exactly one file with no digest.
pub struct PurpurMcProvider {
    label: String,
    project: String,
    api_base_url: String,
    client: JsonClient,
}

impl PurpurMcProvider {
    pub fn new(project: &str, api_base_url: Option<&str>, config: &HttpConfig) -> Self {
        Self {
            label: format!("purpurmc/{project}"),
            project: project.to_owned(),
            api_base_url: trim_base(api_base_url.unwrap_or(DEFAULT_API_BASE)),
            client: JsonClient::new(config),
        }
    }

    fn file_for(&self, version: &str, build: &BuildId) -> FileDescriptor {
        FileDescriptor {
            kind: "application".to_owned(),
            name: format!("{}-{}-{}.jar", self.project, version, build),
            download_url: format!(
                "{}/{}/{}/{}/download",
                self.api_base_url, self.project, version, build
            ),
            sha256: None,
        }
    }
}

#[async_trait::async_trait]
impl Provider for PurpurMcProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_versions(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/{}", self.api_base_url, self.project);
        let response: ProjectResponse = self.client.get(&url).await?;
        Ok(response.versions)
    }

    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError> {
        let url = format!("{}/{}/{}", self.api_base_url, self.project, version);
        let response: VersionResponse = self.client.get(&url).await?;
        let build = response.builds.latest;

        Ok(BuildDescriptor {
            version: version.to_owned(),
            files: vec![self.file_for(version, &build)],
            build,
        })
    }
}
