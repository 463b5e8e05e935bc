use anyhow::{Context, Result};
use composer::TagSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app;
use crate::cli::Cli;

/// Output directory used when nothing else is configured
pub const DEFAULT_OUTPUT_DIR: &str = "cdk.out";

// ============================================================================
// Config File
// ============================================================================

/// Optional `stackplan.toml` overrides
///
/// ```toml
/// output = "build/cdk.out"
///
/// [tags]
/// Team = "Data Platform"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Output directory for the synthesized manifest
    #[serde(default)]
    pub output: Option<String>,

    /// Extra tags merged over the built-in set
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl FileConfig {
    /// Load a config file; `~` and environment variables in the path are expanded
    pub fn load(path: &str) -> Result<Self> {
        let path = expand(path);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML format in {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Effective settings for one run
#[derive(Debug)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    /// Built-in tags with any config file tags merged over them
    pub tags: TagSet,
}

impl Settings {
    /// Combine CLI/env values with the optional config file
    ///
    /// CLI and environment values win over the file.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match cli.config.as_deref() {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(cli.output.as_deref(), cli.dry_run, file))
    }

    fn resolve(output: Option<&Path>, dry_run: bool, file: FileConfig) -> Self {
        let output_dir = output
            .map(Path::to_path_buf)
            .or_else(|| file.output.as_deref().map(expand))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let extra: TagSet = file.tags.into_iter().collect();
        let tags = app::tags().merged(&extra);

        Self {
            output_dir,
            dry_run,
            tags,
        }
    }
}

/// Expand `~` and environment variables in a path string
fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, false, FileConfig::default());
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.tags, app::tags());
    }

    #[test]
    fn test_cli_output_wins() {
        let file = FileConfig {
            output: Some("from-file".to_string()),
            tags: BTreeMap::new(),
        };
        let settings = Settings::resolve(Some(Path::new("from-cli")), false, file);
        assert_eq!(settings.output_dir, PathBuf::from("from-cli"));
    }

    #[test]
    fn test_file_tags_merge() {
        let file = FileConfig {
            output: None,
            tags: BTreeMap::from([
                ("Team".to_string(), "Data Platform".to_string()),
                ("Environment".to_string(), "Staging".to_string()),
            ]),
        };
        let settings = Settings::resolve(None, false, file);

        assert_eq!(settings.tags.get("Team"), Some("Data Platform"));
        assert_eq!(settings.tags.get("Environment"), Some("Staging"));
        assert_eq!(settings.tags.get("Project"), Some("EcommerceSalesDashboard"));
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stackplan.toml");
        fs::write(
            &path,
            "output = \"build/out\"\n\n[tags]\nTeam = \"Data Platform\"\n",
        )
        .unwrap();

        let config = FileConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.output.as_deref(), Some("build/out"));
        assert_eq!(config.tags["Team"], "Data Platform");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(FileConfig::load(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "tags = [").unwrap();
        assert!(FileConfig::load(path.to_str().unwrap()).is_err());
    }
}
