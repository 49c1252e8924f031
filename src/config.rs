use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "ctse.toml";

/// Editor settings, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    /// Binary stage catalog asset.
    pub catalog_path: PathBuf,
    /// Upgrade outdated saves to the newest format when opening them.
    pub auto_migrate: bool,
    pub apply_dlc_lock_on_open: bool,
    /// Keep the previous file as `<save>.bak` when overwriting.
    pub backup_on_write: bool,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("assets/bin/StageNodeInfo.bin"),
            auto_migrate: false,
            apply_dlc_lock_on_open: true,
            backup_on_write: true,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    #[diagnostic(
        code(config::not_found),
        help("run without --config to use the defaults, or create the file")
    )]
    NotFound(PathBuf),

    #[error("failed to parse config: {0}")]
    #[diagnostic(code(config::parse_error))]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    #[diagnostic(code(config::serialize_error))]
    Serialize(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    #[diagnostic(code(config::io_error))]
    Io(#[from] std::io::Error),
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };
        Ok(toml::from_str(&content)?)
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform config directory, or `ctse.toml` in the working directory
    /// when none can be determined.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "aurumsmods", "ctse")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("ctse.toml");
        let config = EditorConfig {
            catalog_path: PathBuf::from("/opt/ctse/StageNodeInfo.bin"),
            auto_migrate: true,
            apply_dlc_lock_on_open: false,
            backup_on_write: false,
            log_filter: "kinopio_save=debug".to_string(),
        };
        config.save(&path).expect("save config");
        let loaded = EditorConfig::load(&path).expect("load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EditorConfig = toml::from_str("auto_migrate = true").expect("parse");
        assert!(config.auto_migrate);
        assert!(config.apply_dlc_lock_on_open);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::NotFound(_))
        ));
        assert_eq!(
            EditorConfig::load_or_default(&path).expect("defaults"),
            EditorConfig::default()
        );
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "auto_migrate = \"maybe\"").expect("write");
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
