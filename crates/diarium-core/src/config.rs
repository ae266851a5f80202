use crate::error::ErrorCode;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// File name the collector gives the snapshot inside the source directory.
pub const SNAPSHOT_FILE_NAME: &str = "db.sqlite";

/// Project config file name, looked up in the working directory.
pub const PROJECT_FILE_NAME: &str = "diarium.toml";

/// Optional per-project settings from `diarium.toml`. Every field may be
/// absent; CLI flags and environment variables override what is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved site configuration for one build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory containing the snapshot produced by the collector.
    pub source_dir: PathBuf,
    /// The site year; every page is scoped to it.
    pub year: i32,
    /// Keywords tracked on the overview page and given dedicated pages.
    pub keywords: Vec<String>,
    /// Where `dia build` writes the artifact tree.
    pub output_dir: PathBuf,
}

impl SiteConfig {
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.source_dir.join(SNAPSHOT_FILE_NAME)
    }
}

pub fn load_project_file(project_root: &Path) -> Result<ProjectFile> {
    let path = project_root.join(PROJECT_FILE_NAME);
    if !path.exists() {
        return Ok(ProjectFile::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectFile>(&content).with_context(|| {
        format!(
            "{}: failed to parse {}",
            ErrorCode::ConfigParseError,
            path.display()
        )
    })
}

/// Resolve the effective configuration: CLI flag > environment > file,
/// defaults where a default exists.
pub fn resolve_config(
    project_root: &Path,
    cli_source_dir: Option<PathBuf>,
    cli_year: Option<i32>,
) -> Result<SiteConfig> {
    let file = load_project_file(project_root)?;
    let env_source_dir = env::var_os("DIARIUM_SOURCE_DIR").map(PathBuf::from);
    let env_year = match env::var("DIARIUM_YEAR") {
        Ok(raw) => Some(
            raw.parse::<i32>()
                .with_context(|| format!("DIARIUM_YEAR is not a year: {raw:?}"))?,
        ),
        Err(_) => None,
    };

    resolve_from_parts(file, cli_source_dir, cli_year, env_source_dir, env_year)
}

fn resolve_from_parts(
    file: ProjectFile,
    cli_source_dir: Option<PathBuf>,
    cli_year: Option<i32>,
    env_source_dir: Option<PathBuf>,
    env_year: Option<i32>,
) -> Result<SiteConfig> {
    let Some(source_dir) = cli_source_dir.or(env_source_dir).or(file.source_dir) else {
        bail!(
            "{}: {}",
            ErrorCode::SourceNotConfigured,
            ErrorCode::SourceNotConfigured.message()
        );
    };

    let Some(year) = cli_year.or(env_year).or(file.year) else {
        bail!(
            "{}: {}",
            ErrorCode::YearNotConfigured,
            ErrorCode::YearNotConfigured.message()
        );
    };

    Ok(SiteConfig {
        source_dir,
        year,
        keywords: file.keywords.unwrap_or_else(default_keywords),
        output_dir: file.output_dir.unwrap_or_else(default_output_dir),
    })
}

fn default_keywords() -> Vec<String> {
    vec!["asbest".to_string(), "inspektion".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}
