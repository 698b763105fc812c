use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use mc_mirror::{Project, ProviderKind};
use mc_mirror_http::HttpConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            log_file: default_log_file(),
            interval_hours: default_interval_hours(),
            http: HttpSettings::default(),
            projects: default_projects(),
        }
    }
}

impl AppConfig {
    /// Reject values the CLI would refuse, and project ids that are not a
    /// plain directory name.
    pub fn validate(&self) -> Result<()> {
        if self.interval_hours == 0 {
            bail!("interval_hours must be at least 1");
        }

        for entry in &self.projects {
            let mut components = Path::new(&entry.id).components();
            if !matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            ) {
                bail!("project id {:?} must be a single directory name", entry.id);
            }
        }

        Ok(())
    }
}

/// Request timeouts, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_metadata_timeout")]
    pub metadata_timeout_secs: u64,
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            metadata_timeout_secs: default_metadata_timeout(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            metadata_timeout: Duration::from_secs(self.metadata_timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
        }
    }
}

/// A single mirrored project.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub provider: ProviderType,
}

impl ProjectEntry {
    fn new(id: &str, name: &str, provider: ProviderType) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            enabled: true,
            provider,
        }
    }

    pub fn project(&self) -> Project {
        let kind = match self.provider {
            ProviderType::PaperMc { .. } => ProviderKind::PaperMc,
            ProviderType::PurpurMc { .. } => ProviderKind::PurpurMc,
            ProviderType::StaticPath { .. } => ProviderKind::StaticPath,
        };
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        Project::new(&self.id, name, kind)
    }
}

/// The upstream a project is fetched from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ProviderType {
    #[serde(rename = "papermc")]
    PaperMc { api_base_url: Option<String> },

    #[serde(rename = "purpurmc")]
    PurpurMc { api_base_url: Option<String> },

    /// No API; `versions` replaces the built-in version table when set.
    #[serde(rename = "static-path")]
    StaticPath {
        download_base_url: Option<String>,
        versions: Option<Vec<String>>,
    },
}

fn default_true() -> bool {
    true
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("mc-mirror.log")
}

fn default_interval_hours() -> u64 {
    24
}

fn default_metadata_timeout() -> u64 {
    10
}

fn default_download_timeout() -> u64 {
    600
}

/// Built-in registry of mirrored projects.
pub fn default_projects() -> Vec<ProjectEntry> {
    let paper = || ProviderType::PaperMc { api_base_url: None };
    vec![
        ProjectEntry::new("paper", "Paper", paper()),
        ProjectEntry::new("velocity", "Velocity", paper()),
        ProjectEntry::new("waterfall", "Waterfall", paper()),
        ProjectEntry::new(
            "purpur",
            "Purpur",
            ProviderType::PurpurMc { api_base_url: None },
        ),
        ProjectEntry::new(
            "spigot",
            "Spigot",
            ProviderType::StaticPath {
                download_base_url: None,
                versions: None,
            },
        ),
    ]
}

/// Config file path: `~/.config/mc-mirror/mirror.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mc-mirror").join("mirror.toml"))
}

pub fn parse(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).context("invalid config")?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit path, or from the default location, falling
/// back to built-in defaults.
///
/// An explicit path must exist and parse. A broken file at the default
/// location only produces a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        return parse(&contents).with_context(|| format!("in {}", path.display()));
    }

    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        if let Ok(config) = parse(&contents) {
            return Ok(config);
        }
        // Logging is not up yet; the log file location lives in this config.
        eprintln!(
            "warning: failed to parse config at {}, using defaults",
            path.display()
        );
    }

    Ok(AppConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_projects_cover_every_provider() {
        let projects = default_projects();
        let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["paper", "velocity", "waterfall", "purpur", "spigot"]);

        assert_eq!(projects[0].project().kind, ProviderKind::PaperMc);
        assert_eq!(projects[3].project().kind, ProviderKind::PurpurMc);
        assert_eq!(projects[4].project().kind, ProviderKind::StaticPath);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.content_dir, PathBuf::from("content"));
        assert_eq!(config.log_file, PathBuf::from("mc-mirror.log"));
        assert_eq!(config.interval_hours, 24);
        assert_eq!(config.http.metadata_timeout_secs, 10);
        assert_eq!(config.projects.len(), 5);
    }

    #[test]
    fn parse_papermc_project() {
        let config = parse(
            r#"
content_dir = "/srv/mirror"
interval_hours = 6

[[projects]]
id = "folia"
name = "Folia"
type = "papermc"
api_base_url = "https://papermc.example.test/v2/projects"
"#,
        )
        .unwrap();

        assert_eq!(config.content_dir, PathBuf::from("/srv/mirror"));
        assert_eq!(config.interval_hours, 6);
        assert_eq!(config.projects.len(), 1);

        let entry = &config.projects[0];
        assert!(entry.enabled);
        assert_eq!(entry.project().name, "Folia");
        match &entry.provider {
            ProviderType::PaperMc { api_base_url } => assert_eq!(
                api_base_url.as_deref(),
                Some("https://papermc.example.test/v2/projects")
            ),
            _ => panic!("expected PaperMc"),
        }
    }

    #[test]
    fn parse_purpurmc_project_without_base_url() {
        let config = parse(
            r#"
[[projects]]
id = "purpur"
type = "purpurmc"
"#,
        )
        .unwrap();

        let entry = &config.projects[0];
        assert!(matches!(
            entry.provider,
            ProviderType::PurpurMc { api_base_url: None }
        ));
        // Name falls back to the id.
        assert_eq!(entry.project().name, "purpur");
    }

    #[test]
    fn parse_static_path_with_versions() {
        let config = parse(
            r#"
[[projects]]
id = "spigot"
type = "static-path"
versions = ["1.21", "1.20.4"]
enabled = false
"#,
        )
        .unwrap();

        let entry = &config.projects[0];
        assert!(!entry.enabled);
        match &entry.provider {
            ProviderType::StaticPath {
                download_base_url,
                versions,
            } => {
                assert!(download_base_url.is_none());
                assert_eq!(
                    versions.as_deref(),
                    Some(&["1.21".to_owned(), "1.20.4".to_owned()][..])
                );
            }
            _ => panic!("expected StaticPath"),
        }
    }

    #[test]
    fn unknown_provider_type_is_rejected() {
        let result = parse(
            r#"
[[projects]]
id = "fabric"
type = "fabricmc"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn http_settings_convert_to_durations() {
        let config = parse(
            r#"
[http]
metadata_timeout_secs = 5
download_timeout_secs = 120
"#,
        )
        .unwrap();

        let http = config.http.to_http_config();
        assert_eq!(http.metadata_timeout, Duration::from_secs(5));
        assert_eq!(http.download_timeout, Duration::from_secs(120));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = parse("interval_hours = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("interval_hours"));
    }

    #[test]
    fn project_id_must_be_a_single_directory_name() {
        for id in ["../paper", "a/b", "..", "/srv/paper", ""] {
            let contents = format!("[[projects]]\nid = {id:?}\ntype = \"papermc\"\n");
            assert!(parse(&contents).is_err(), "accepted id {id:?}");
        }
    }

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.toml");
        std::fs::write(&path, "interval_hours = 1\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.interval_hours, 1);
    }

    #[test]
    fn explicit_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mirror.toml");
        std::fs::write(&path, "interval_hours = \"soon\"\n").unwrap();

        assert!(load_config(Some(&path)).is_err());
    }
}
