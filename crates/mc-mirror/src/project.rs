use std::fmt;

/// Which upstream API shape a project is mirrored from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// PaperMC-style API: version list, build list, per-build download map.
    PaperMc,
    /// PurpurMC-style API: version list, single "latest build" field.
    PurpurMc,
    /// No API at all; versions come from a hand-maintained table.
    StaticPath,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaperMc => write!(f, "papermc"),
            Self::PurpurMc => write!(f, "purpurmc"),
            Self::StaticPath => write!(f, "static-path"),
        }
    }
}

/// A tracked upstream project, e.g. `paper` or `velocity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Upstream identifier, also used as the directory name under the content root.
    pub id: String,
    /// Human-readable name used in log lines.
    pub name: String,
    pub kind: ProviderKind,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
