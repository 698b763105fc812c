use mc_mirror::{BuildDescriptor, BuildId, FileDescriptor, Provider, ProviderError};

use crate::catalog;
use crate::client::trim_base;

pub const DEFAULT_DOWNLOAD_BASE: &str = "https://download.getbukkit.org";

/// Projects only reachable through static download paths (spigot, craftbukkit).
///
/// Never touches the network: versions come from a fixed table, and the
/// version label doubles as the build id since upstream has no numbering.
pub struct StaticPathProvider {
    label: String,
    project: String,
    download_base_url: String,
    versions: Vec<String>,
}

impl StaticPathProvider {
    /// `versions` overrides the built-in catalog when given.
    pub fn new(
        project: &str,
        download_base_url: Option<&str>,
        versions: Option<Vec<String>>,
    ) -> Self {
        let versions = versions.unwrap_or_else(|| {
            catalog::known_versions(project)
                .iter()
                .map(|v| (*v).to_owned())
                .collect()
        });

        Self {
            label: format!("static/{project}"),
            project: project.to_owned(),
            download_base_url: trim_base(download_base_url.unwrap_or(DEFAULT_DOWNLOAD_BASE)),
            versions,
        }
    }

    fn file_for(&self, version: &str) -> FileDescriptor {
        FileDescriptor {
            kind: "application".to_owned(),
            name: format!("{}-{}.jar", capitalize(&self.project), version),
            download_url: format!(
                "{}/{}/{}-{}.jar",
                self.download_base_url, self.project, self.project, version
            ),
            sha256: None,
        }
    }
}

#[async_trait::async_trait]
impl Provider for StaticPathProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_versions(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self.versions.clone())
    }

    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError> {
        Ok(BuildDescriptor {
            version: version.to_owned(),
            build: BuildId::Text(version.to_owned()),
            files: vec![self.file_for(version)],
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
