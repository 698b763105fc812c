use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::descriptor::BuildDescriptor;
use crate::download::Downloader;
use crate::project::Project;
use crate::provider::Provider;
use crate::report::{ProjectReport, RunReport, VersionOutcome};
use crate::state::{StateStore, VersionRecord};
use crate::verify::verify;

/// A configured project paired with the provider chosen for it.
#[derive(Clone)]
pub struct MirrorTarget {
    pub project: Project,
    pub provider: Arc<dyn Provider>,
}

impl MirrorTarget {
    pub fn new(project: Project, provider: Arc<dyn Provider>) -> Self {
        Self { project, provider }
    }
}

/// Drives listing, downloading, verification and state updates for projects
/// mirrored under `content_root/<project>/<version>/`.
///
/// Everything runs strictly in sequence: one project, one version, one file
/// at a time. Upstream and transport failures are logged and folded into the
/// returned reports; nothing here returns an error.
pub struct SyncEngine {
    content_root: PathBuf,
    downloader: Arc<dyn Downloader>,
    store: Arc<dyn StateStore>,
}

impl SyncEngine {
    pub fn new(
        content_root: impl Into<PathBuf>,
        downloader: Arc<dyn Downloader>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            content_root: content_root.into(),
            downloader,
            store,
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    pub fn project_dir(&self, project: &Project) -> PathBuf {
        self.content_root.join(&project.id)
    }

    /// One full pass over every target.
    pub async fn run(&self, targets: &[MirrorTarget]) -> RunReport {
        let mut report = RunReport::default();

        for target in targets {
            let project_report = self
                .sync_project(&target.project, target.provider.as_ref())
                .await;
            report.projects.push(project_report);
        }

        if report.is_success() {
            tracing::info!(projects = report.projects.len(), "all projects synced");
        } else {
            let failed: Vec<&str> = report
                .failed_projects()
                .map(|p| p.project_id.as_str())
                .collect();
            tracing::warn!(failed = ?failed, "some projects failed to sync");
        }

        report
    }

    /// Sync every version `provider` lists for `project`.
    pub async fn sync_project(&self, project: &Project, provider: &dyn Provider) -> ProjectReport {
        tracing::info!(project = %project, provider = provider.label(), "syncing project");
        let mut report = ProjectReport::new(&project.id);

        let project_dir = self.project_dir(project);
        if let Err(e) = std::fs::create_dir_all(&project_dir) {
            tracing::error!(
                project = %project.id,
                dir = %project_dir.display(),
                error = %e,
                "could not create project directory"
            );
            return report;
        }

        let versions = match provider.list_versions().await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::error!(project = %project.id, error = %e, "could not list versions");
                Vec::new()
            }
        };

        if versions.is_empty() {
            tracing::warn!(project = %project.id, "no versions listed, nothing to sync");
            return report;
        }

        tracing::info!(project = %project.id, count = versions.len(), "versions listed");

        for version in versions {
            let outcome = self.sync_version(project, provider, &version).await;
            report.versions.push((version, outcome));
        }

        tracing::info!(
            project = %project.id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            total = report.versions.len(),
            "project sync finished"
        );

        report
    }

    /// Bring one version directory up to date with the latest upstream build.
    pub async fn sync_version(
        &self,
        project: &Project,
        provider: &dyn Provider,
        version: &str,
    ) -> VersionOutcome {
        tracing::info!(project = %project.id, version, "syncing version");

        if !is_single_component(version) {
            tracing::error!(project = %project.id, version, "refusing unsafe version label");
            return failed(format!("unsafe version label {version:?}"));
        }

        let descriptor = match provider.resolve_build(version).await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::error!(
                    project = %project.id,
                    version,
                    error = %e,
                    "could not resolve build"
                );
                return failed(format!("could not resolve build: {e}"));
            }
        };

        if let Some(file) = descriptor.files.iter().find(|f| !is_single_component(&f.name)) {
            tracing::error!(
                project = %project.id,
                version,
                name = %file.name,
                "refusing unsafe file name"
            );
            return failed(format!("unsafe file name {:?}", file.name));
        }

        let version_dir = self.project_dir(project).join(version);

        if let Some(record) = self.store.load(&version_dir)
            && record.build == descriptor.build
        {
            let missing = missing_files(&version_dir, &descriptor);
            if missing == 0 {
                tracing::info!(
                    project = %project.id,
                    version,
                    build = %descriptor.build,
                    "already up to date"
                );
                return VersionOutcome::UpToDate {
                    build: descriptor.build,
                };
            }
            tracing::info!(
                project = %project.id,
                version,
                build = %descriptor.build,
                missing,
                "files missing, downloading the build again"
            );
        }

        self.fetch_build(project, &version_dir, descriptor).await
    }

    async fn fetch_build(
        &self,
        project: &Project,
        version_dir: &Path,
        descriptor: BuildDescriptor,
    ) -> VersionOutcome {
        let version = descriptor.version.as_str();

        if let Err(e) = std::fs::create_dir_all(version_dir) {
            tracing::error!(
                dir = %version_dir.display(),
                error = %e,
                "could not create version directory"
            );
            return failed(format!("could not create {}: {e}", version_dir.display()));
        }

        let mut failures = 0usize;

        // Keep going after a failure so later files still land on disk.
        for file in &descriptor.files {
            let dest = version_dir.join(&file.name);

            match self.downloader.download(&file.download_url, &dest).await {
                Ok(bytes) => {
                    tracing::info!(
                        project = %project.id,
                        version,
                        name = %file.name,
                        bytes,
                        "downloaded"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        project = %project.id,
                        version,
                        url = %file.download_url,
                        error = %e,
                        "download failed"
                    );
                    failures += 1;
                    continue;
                }
            }

            if !verify(&dest, file.sha256.as_deref()) {
                failures += 1;
            }
        }

        if failures > 0 {
            return failed(format!(
                "{failures} of {} files failed for build {}",
                descriptor.files.len(),
                descriptor.build
            ));
        }

        let build = descriptor.build.clone();
        let files = descriptor.files.len();
        let record = VersionRecord::from(descriptor);

        if let Err(e) = self.store.save(version_dir, &record) {
            tracing::error!(
                dir = %version_dir.display(),
                error = %e,
                "could not save version record"
            );
            return failed(format!("could not save version record: {e}"));
        }

        tracing::info!(
            project = %project.id,
            version = %record.version,
            build = %build,
            "version synced"
        );
        VersionOutcome::Fetched { build, files }
    }
}

fn failed(reason: String) -> VersionOutcome {
    VersionOutcome::Failed { reason }
}

fn missing_files(version_dir: &Path, descriptor: &BuildDescriptor) -> usize {
    descriptor
        .files
        .iter()
        .filter(|f| !version_dir.join(&f.name).is_file())
        .count()
}

/// Upstream labels become path components; reject anything that could escape.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
