use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::descriptor::{BuildDescriptor, BuildId, FileDescriptor};

/// Name of the sidecar file kept in every version directory.
pub const SIDECAR_FILE_NAME: &str = "version_info.json";

/// The last build of a version that was fully downloaded and verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,
    pub build: BuildId,
    pub files: Vec<FileDescriptor>,
}

impl From<BuildDescriptor> for VersionRecord {
    fn from(descriptor: BuildDescriptor) -> Self {
        Self {
            version: descriptor.version,
            build: descriptor.build,
            files: descriptor.files,
        }
    }
}

/// Errors specific to persisting local state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Per-version persisted sync state.
pub trait StateStore: Send + Sync {
    /// Load the record for `version_dir`.
    ///
    /// A missing or unreadable record yields `None`; implementations log
    /// corruption rather than returning it.
    fn load(&self, version_dir: &Path) -> Option<VersionRecord>;

    /// Overwrite the record for `version_dir`.
    fn save(&self, version_dir: &Path, record: &VersionRecord) -> Result<(), StoreError>;
}

impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self, version_dir: &Path) -> Option<VersionRecord> {
        (**self).load(version_dir)
    }

    fn save(&self, version_dir: &Path, record: &VersionRecord) -> Result<(), StoreError> {
        (**self).save(version_dir, record)
    }
}
