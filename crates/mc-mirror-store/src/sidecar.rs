use std::path::{Path, PathBuf};

use mc_mirror::{SIDECAR_FILE_NAME, StateStore, StoreError, VersionRecord};

/// Keeps each version's record as a JSON file next to its downloads.
#[derive(Debug, Clone, Default)]
pub struct SidecarStore;

impl SidecarStore {
    pub fn new() -> Self {
        Self
    }

    pub fn sidecar_path(version_dir: &Path) -> PathBuf {
        version_dir.join(SIDECAR_FILE_NAME)
    }
}

impl StateStore for SidecarStore {
    fn load(&self, version_dir: &Path) -> Option<VersionRecord> {
        let path = Self::sidecar_path(version_dir);
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "could not read version record"
                );
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "malformed version record, treating version as never synced"
                );
                None
            }
        }
    }

    fn save(&self, version_dir: &Path, record: &VersionRecord) -> Result<(), StoreError> {
        let path = Self::sidecar_path(version_dir);
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;

        std::fs::write(&tmp, json)
            .map_err(|e| StoreError::Io(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), build = %record.build, "version record saved");
        Ok(())
    }
}
