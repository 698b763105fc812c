pub mod descriptor;
pub mod download;
pub mod project;
pub mod provider;
pub mod report;
pub mod state;
pub mod sync;
pub mod verify;

pub use descriptor::{BuildDescriptor, BuildId, FileDescriptor};
pub use download::{DownloadError, Downloader};
pub use project::{Project, ProviderKind};
pub use provider::{Provider, ProviderError};
pub use report::{ProjectReport, RunReport, VersionOutcome};
pub use state::{SIDECAR_FILE_NAME, StateStore, StoreError, VersionRecord};
pub use sync::{MirrorTarget, SyncEngine};
pub use verify::{sha256_file, verify};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
