use std::fmt;

use crate::descriptor::BuildId;

/// Result of syncing one version of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOutcome {
    /// Local record matched the latest build and every file was present.
    UpToDate { build: BuildId },
    /// Every file was downloaded and verified and the record was written.
    Fetched { build: BuildId, files: usize },
    /// The version could not be brought up to date this run.
    Failed { reason: String },
}

impl VersionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for VersionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate { build } => write!(f, "up to date (build {build})"),
            Self::Fetched { build, files } => write!(f, "fetched build {build} ({files} files)"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Summary of syncing every version of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReport {
    pub project_id: String,
    /// Per-version outcomes, in upstream listing order.
    pub versions: Vec<(String, VersionOutcome)>,
}

impl ProjectReport {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            versions: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.versions.iter().filter(|(_, o)| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.versions.len() - self.succeeded()
    }

    /// A project with nothing listed downloaded nothing and counts as failed.
    pub fn is_success(&self) -> bool {
        !self.versions.is_empty() && self.failed() == 0
    }
}

/// Summary of one full pass over every configured project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub projects: Vec<ProjectReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.projects.iter().all(ProjectReport::is_success)
    }

    pub fn failed_projects(&self) -> impl Iterator<Item = &ProjectReport> {
        self.projects.iter().filter(|p| !p.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched() -> VersionOutcome {
        VersionOutcome::Fetched {
            build: BuildId::Number(1),
            files: 1,
        }
    }

    fn failed() -> VersionOutcome {
        VersionOutcome::Failed {
            reason: "boom".into(),
        }
    }

    #[test]
    fn project_counts() {
        let mut report = ProjectReport::new("paper");
        report.versions.push(("1.20.4".into(), fetched()));
        report.versions.push((
            "1.20.2".into(),
            VersionOutcome::UpToDate {
                build: BuildId::Number(5),
            },
        ));
        report.versions.push(("1.20.1".into(), failed()));

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn empty_project_is_failure() {
        assert!(!ProjectReport::new("paper").is_success());
    }

    #[test]
    fn run_success_requires_every_project() {
        let mut ok = ProjectReport::new("paper");
        ok.versions.push(("1.20.4".into(), fetched()));
        let empty = ProjectReport::new("velocity");

        let run = RunReport {
            projects: vec![ok.clone()],
        };
        assert!(run.is_success());

        let run = RunReport {
            projects: vec![ok, empty],
        };
        assert!(!run.is_success());
        let failed: Vec<_> = run.failed_projects().map(|p| p.project_id.as_str()).collect();
        assert_eq!(failed, vec!["velocity"]);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(fetched().to_string(), "fetched build 1 (1 files)");
        assert_eq!(failed().to_string(), "failed: boom");
    }
}
