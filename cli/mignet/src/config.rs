//! `mignet.toml` configuration.
//!
//! Every key is optional; command-line flags take precedence.
//!
//! ```toml
//! [build]
//! author = "jane"
//! tool = "mignet"
//! migration-type = "regional"
//!
//! [grid]
//! resolution = 30
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use mignet_core::{MigrationType, Resolution};

/// Name of the configuration file searched for.
pub const CONFIG_FILE: &str = "mignet.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MignetConfig {
    /// Build defaults.
    #[serde(default)]
    pub build: BuildConfig,
    /// Grid addressing defaults.
    #[serde(default)]
    pub grid: GridConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildConfig {
    /// Author recorded in header files.
    #[serde(default)]
    pub author: Option<String>,
    /// Tool name recorded in header files.
    #[serde(default)]
    pub tool: Option<String>,
    /// Default migration type (any unambiguous prefix).
    #[serde(default)]
    pub migration_type: Option<String>,
}

/// `[grid]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    /// Grid spacing in arc-seconds.
    #[serde(default)]
    pub resolution: Option<u32>,
}

impl MignetConfig {
    /// Search upward from `start_dir` for a `mignet.toml` file and parse it.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Some((Self::load(&candidate)?, candidate)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Migration type from the flag, falling back to the configured default.
    pub fn migration_type(&self, flag: Option<&str>) -> Result<MigrationType> {
        let name = flag
            .or(self.build.migration_type.as_deref())
            .context("no migration type given: pass --migration-type or set build.migration-type")?;
        Ok(MigrationType::from_prefix(name)?)
    }

    /// Author from the flag, the configuration, or the environment.
    pub fn author(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.build.author.clone())
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Tool name recorded in header files.
    pub fn tool(&self) -> String {
        self.build
            .tool
            .clone()
            .unwrap_or_else(|| concat!("mignet ", env!("CARGO_PKG_VERSION")).to_string())
    }

    /// Grid resolution from the flag, falling back to the configured one.
    pub fn resolution(&self, flag: Option<u32>) -> Result<Option<Resolution>> {
        match flag.or(self.grid.resolution) {
            Some(arcsec) => Ok(Some(Resolution::from_arcsec(arcsec)?)),
            None => Ok(None),
        }
    }
}

/// Load the explicit config file if given, otherwise search from `cwd`.
/// Returns the default configuration when none is found.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<MignetConfig> {
    match explicit {
        Some(path) => MignetConfig::load(path),
        None => match MignetConfig::find_and_load(cwd)? {
            Some((config, path)) => {
                log::debug!("using configuration {}", path.display());
                Ok(config)
            }
            None => Ok(MignetConfig::default()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> MignetConfig {
        toml::from_str(s).unwrap()
    }

    #[test]
    fn parse_full() {
        let config = parse(
            r#"
[build]
author = "jane"
tool = "netgen"
migration-type = "reg"

[grid]
resolution = 150
"#,
        );
        assert_eq!(config.author(None), "jane");
        assert_eq!(config.tool(), "netgen");
        assert_eq!(config.migration_type(None).unwrap(), MigrationType::Regional);
        assert_eq!(config.resolution(None).unwrap(), Some(Resolution::Arcsec150));
    }

    #[test]
    fn flags_override_config() {
        let config = parse("[build]\nauthor = \"jane\"\nmigration-type = \"air\"\n");
        assert_eq!(config.author(Some("sam")), "sam");
        assert_eq!(config.migration_type(Some("sea")).unwrap(), MigrationType::Sea);
        assert_eq!(config.resolution(Some(30)).unwrap(), Some(Resolution::Arcsec30));
    }

    #[test]
    fn empty_config_defaults() {
        let config = parse("");
        assert!(config.migration_type(None).is_err());
        assert!(config.tool().starts_with("mignet "));
        assert_eq!(config.resolution(None).unwrap(), None);
    }

    #[test]
    fn bad_values_rejected() {
        let config = parse("[grid]\nresolution = 60\n");
        assert!(config.resolution(None).is_err());
        let config = parse("[build]\nmigration-type = \"rail\"\n");
        assert!(config.migration_type(None).is_err());
        assert!(toml::from_str::<MignetConfig>("[build]\nauthr = \"x\"\n").is_err());
    }

    #[test]
    fn found_by_upward_search() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[build]\nauthor = \"found\"\n").unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = MignetConfig::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(config.author(None), "found");
        assert_eq!(path, dir.path().join(CONFIG_FILE));

        let config = resolve_config(None, &nested).unwrap();
        assert_eq!(config.build.author.as_deref(), Some("found"));
    }

    #[test]
    fn explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("nope.toml")), dir.path()).is_err());
    }
}
