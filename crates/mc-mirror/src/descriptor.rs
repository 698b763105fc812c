use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-specific build identifier.
///
/// PaperMC numbers builds with integers; PurpurMC and static-path providers
/// use strings. Serialized untagged so the sidecar keeps the upstream shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for BuildId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for BuildId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for BuildId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One downloadable file of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Logical type tag, e.g. `application` or `mojang-mappings`.
    #[serde(rename = "type")]
    pub kind: String,
    /// File name inside the version directory.
    pub name: String,
    pub download_url: String,
    /// Expected lowercase hex SHA-256. `None` when the provider publishes none.
    pub sha256: Option<String>,
}

/// The latest build of a version as reported by upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub version: String,
    pub build: BuildId,
    pub files: Vec<FileDescriptor>,
}
