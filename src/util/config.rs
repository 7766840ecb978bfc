//! Build profile files for lecfg.
//!
//! lecfg reads profiles from two locations:
//! - Global: `~/.lecfg/config.toml` - User-wide defaults
//! - Project: `.lecfg/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. A profile passed with
//! `--config` replaces both, and `-o name=value` on the command line wins
//! over every file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::artifact::BuildMode;
use crate::core::field::RawValue;
use crate::core::version::SchemaVersion;

/// A build profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version identifier
    pub schema: Option<SchemaVersion>,

    /// Build mode (debug, release)
    pub mode: Option<BuildMode>,

    /// Target platform
    pub platform: PlatformConfig,

    /// Option overrides, keyed by field name
    pub options: BTreeMap<String, RawValue>,
}

/// Target platform of the native build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Operating system, e.g. `linux` or `pikeos`
    pub os: Option<String>,

    /// CPU architecture, e.g. `x86_64`
    pub arch: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Options merge per key.
    pub fn merge(&mut self, other: Config) {
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        if other.mode.is_some() {
            self.mode = other.mode;
        }
        if other.platform.os.is_some() {
            self.platform.os = other.platform.os;
        }
        if other.platform.arch.is_some() {
            self.platform.arch = other.platform.arch;
        }
        self.options.extend(other.options);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.lecfg/config.toml)
/// 2. Global config (~/.lecfg/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global lecfg config directory (~/.lecfg).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".lecfg"))
}

/// Get the global config path (~/.lecfg/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.lecfg/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".lecfg").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.schema.is_none());
        assert!(config.mode.is_none());
        assert!(config.platform.os.is_none());
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
schema = "device-toggles"
mode = "release"

[platform]
os = "pikeos"
arch = "x86_64"

[options]
max_slaves = 512
shared = false
hw_device_bpf = "yes"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.schema, Some(SchemaVersion::DeviceToggles));
        assert_eq!(config.mode, Some(BuildMode::Release));
        assert_eq!(config.platform.os.as_deref(), Some("pikeos"));
        assert_eq!(config.platform.arch.as_deref(), Some("x86_64"));
        assert_eq!(config.options["max_slaves"], RawValue::Int(512));
        assert_eq!(config.options["shared"], RawValue::Bool(false));
        assert_eq!(config.options["hw_device_bpf"], RawValue::Str("yes".to_string()));
    }

    #[test]
    fn test_config_load_rejects_unknown_schema() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "schema = \"v9\"\n").unwrap();

        let err = Config::load(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));
        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.schema = Some(SchemaVersion::Flags);
        base.mode = Some(BuildMode::Debug);
        base.options.insert("max_slaves".to_string(), RawValue::Int(64));
        base.options.insert("max_groups".to_string(), RawValue::Int(2));

        let mut override_cfg = Config::default();
        override_cfg.schema = Some(SchemaVersion::Macros);
        override_cfg
            .options
            .insert("max_slaves".to_string(), RawValue::Int(128));

        base.merge(override_cfg);

        assert_eq!(base.schema, Some(SchemaVersion::Macros));
        assert_eq!(base.mode, Some(BuildMode::Debug)); // Not overridden
        assert_eq!(base.options["max_slaves"], RawValue::Int(128));
        assert_eq!(base.options["max_groups"], RawValue::Int(2));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
schema = "flags"
mode = "release"

[options]
max_slaves = 32
max_pdlen = 1024
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
schema = "macros"

[options]
max_slaves = 16
"#,
        )
        .unwrap();

        let config = load_config(&global_path, &project_path);

        assert_eq!(config.schema, Some(SchemaVersion::Macros));
        assert_eq!(config.mode, Some(BuildMode::Release));
        assert_eq!(config.options["max_slaves"], RawValue::Int(16));
        assert_eq!(config.options["max_pdlen"], RawValue::Int(1024));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("a.toml"), &tmp.path().join("b.toml"));
        assert_eq!(config, Config::default());
    }
}
