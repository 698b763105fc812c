use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use crate::{
    BuildDescriptor, DownloadError, Downloader, FileDescriptor, Provider, ProviderError,
    StateStore, StoreError, VersionRecord,
};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// A file descriptor whose digest matches `body`.
pub fn file_with_digest(kind: &str, name: &str, url: &str, body: &[u8]) -> FileDescriptor {
    FileDescriptor {
        kind: kind.to_owned(),
        name: name.to_owned(),
        download_url: url.to_owned(),
        sha256: Some(sha256_hex(body)),
    }
}

pub fn file_without_digest(kind: &str, name: &str, url: &str) -> FileDescriptor {
    FileDescriptor {
        kind: kind.to_owned(),
        name: name.to_owned(),
        download_url: url.to_owned(),
        sha256: None,
    }
}

/// In-memory provider for testing. Versions are listed in insertion order.
pub struct InMemoryProvider {
    label: String,
    fail_listing: bool,
    versions: Mutex<Vec<String>>,
    builds: Mutex<HashMap<String, BuildDescriptor>>,
}

impl InMemoryProvider {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fail_listing: false,
            versions: Mutex::new(Vec::new()),
            builds: Mutex::new(HashMap::new()),
        }
    }

    /// A provider whose version listing always errors.
    pub fn failing(label: impl Into<String>) -> Self {
        Self {
            fail_listing: true,
            ..Self::new(label)
        }
    }

    /// List `version` without publishing any build for it.
    pub fn list_only(&self, version: &str) {
        let mut versions = self.versions.lock().unwrap();
        if !versions.iter().any(|v| v == version) {
            versions.push(version.to_owned());
        }
    }

    /// Publish `descriptor` as the latest build of its version.
    pub fn set_build(&self, descriptor: BuildDescriptor) {
        self.list_only(&descriptor.version);
        self.builds
            .lock()
            .unwrap()
            .insert(descriptor.version.clone(), descriptor);
    }
}

#[async_trait::async_trait]
impl Provider for InMemoryProvider {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_versions(&self) -> Result<Vec<String>, ProviderError> {
        if self.fail_listing {
            return Err(ProviderError::Network("connection refused".into()));
        }
        Ok(self.versions.lock().unwrap().clone())
    }

    async fn resolve_build(&self, version: &str) -> Result<BuildDescriptor, ProviderError> {
        self.builds
            .lock()
            .unwrap()
            .get(version)
            .cloned()
            .ok_or_else(|| ProviderError::NoBuilds(version.to_owned()))
    }
}

/// Serves canned bodies by URL and records every request.
#[derive(Default)]
pub struct FakeDownloader {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: &[u8]) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_owned(), body.to_vec());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Downloader for FakeDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        self.calls.lock().unwrap().push(url.to_owned());

        let body = self.bodies.lock().unwrap().get(url).cloned();
        match body {
            Some(body) => {
                std::fs::write(dest, &body).map_err(|e| DownloadError::Io(e.to_string()))?;
                Ok(body.len() as u64)
            }
            None => Err(DownloadError::Status {
                status: 404,
                url: url.to_owned(),
            }),
        }
    }
}

/// State store that keeps records in memory, keyed by version directory.
#[derive(Default)]
pub struct InMemoryStateStore {
    records: Mutex<HashMap<PathBuf, VersionRecord>>,
    saves: Mutex<usize>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, version_dir: &Path) -> Option<VersionRecord> {
        self.records.lock().unwrap().get(version_dir).cloned()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self, version_dir: &Path) -> Option<VersionRecord> {
        self.get(version_dir)
    }

    fn save(&self, version_dir: &Path, record: &VersionRecord) -> Result<(), StoreError> {
        *self.saves.lock().unwrap() += 1;
        self.records
            .lock()
            .unwrap()
            .insert(version_dir.to_path_buf(), record.clone());
        Ok(())
    }
}
