//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `KILN_` prefix with `__` between sections
//!    (`KILN_BACKEND__PHP=php8.2`)
//! 3. Config file (`--config`, else the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// How backend packages are installed.
    pub backend: BackendConfig,
    /// Where stub files are read from.
    pub stubs: StubsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// PHP binary used to run a composer.phar.
    pub php: String,
    /// `global`, or the path to a composer.phar.
    pub composer: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            php: "php".into(),
            composer: "global".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration by layering defaults, the config file, and the
    /// environment.
    ///
    /// A file named with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix("KILN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kiln.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }

    /// Look up a dotted key such as `backend.php`.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            value = value.get_mut(part)?.take();
        }
        match value {
            Value::String(s) => Some(s),
            Value::Null | Value::Object(_) | Value::Array(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every known dotted key, in file order.
    pub fn keys() -> &'static [&'static str] {
        &[
            "backend.php",
            "backend.composer",
            "stubs.path",
            "output.no_color",
            "output.format",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_use_global_composer() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend.php, "php");
        assert_eq!(cfg.backend.composer, "global");
        assert!(cfg.stubs.path.is_none());
    }

    #[test]
    fn missing_optional_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.backend, BackendConfig::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kiln.toml");
        std::fs::write(
            &path,
            "[backend]\ncomposer = \"/opt/composer.phar\"\n\n[stubs]\npath = \"/opt/stubs\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path, true).unwrap();
        assert_eq!(cfg.backend.composer, "/opt/composer.phar");
        assert_eq!(cfg.backend.php, "php");
        assert_eq!(cfg.stubs.path, Some(PathBuf::from("/opt/stubs")));
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn get_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("backend.php").as_deref(), Some("php"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert_eq!(cfg.get("stubs.path"), None);
        assert_eq!(cfg.get("backend"), None);
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
