//! src/config.rs
//! ============================================================================
//! # Config: Drive Engine Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate. Every section has
//! defaults, and missing sections or fields fall back to them, so older
//! config files keep loading.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;
use crate::model::storage::StorageUsage;
use crate::model::view_mode::ViewMode;
use crate::upload::simulator::DEFAULT_PROGRESS_STEP;

/// Simulated upload pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Time between progress ticks
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,

    /// Progress added per tick, in percent
    pub progress_step: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            progress_step: DEFAULT_PROGRESS_STEP,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_mode: ViewMode,
}

/// Tracing output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` directives are applied on top
    pub level: String,

    /// Directory for the daily rolling log file
    pub log_dir: PathBuf,

    /// Mirror log lines to stderr
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            stderr: false,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start with the sample listing instead of an empty drive
    pub seed_sample_catalog: bool,

    pub upload: UploadConfig,

    pub view: ViewConfig,

    pub storage: StorageUsage,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_sample_catalog: true,
            upload: UploadConfig::default(),
            view: ViewConfig::default(),
            storage: StorageUsage::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the platform config dir, writing defaults there if
    /// no file exists yet.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/drive/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if TokioFs::try_exists(&path).await.unwrap_or(false) {
            Ok(Self::load_from(&path).await?)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path).await?;
        Ok(())
    }

    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {}", path.display());

        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|e| AppError::config_io(path, e))?;
        let cfg: Self = toml::from_str(&text)?;

        Ok(cfg)
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::config_io(parent, e))?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str)
            .await
            .map_err(|e| AppError::config_io(path, e))?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the config directory (without filename).
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "example", "drive")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.upload.tick_interval = Duration::from_millis(50);
        config.upload.progress_step = 25;
        config.view.default_mode = ViewMode::List;
        config.seed_sample_catalog = false;

        config.save_to(&path).await.unwrap();
        let loaded = Config::load_from(&path).await.unwrap();

        assert_eq!(loaded.upload.tick_interval, Duration::from_millis(50));
        assert_eq!(loaded.upload.progress_step, 25);
        assert_eq!(loaded.view.default_mode, ViewMode::List);
        assert!(!loaded.seed_sample_catalog);
        assert_eq!(loaded.storage, StorageUsage::default());
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        TokioFs::write(&path, "[upload]\ntick_interval = \"1s\"\n")
            .await
            .unwrap();

        let loaded = Config::load_from(&path).await.unwrap();

        assert_eq!(loaded.upload.tick_interval, Duration::from_secs(1));
        assert_eq!(loaded.upload.progress_step, DEFAULT_PROGRESS_STEP);
        assert_eq!(loaded.view.default_mode, ViewMode::Grid);
        assert!(loaded.seed_sample_catalog);
    }

    #[tokio::test]
    async fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load_from(&path).await.unwrap_err();

        assert!(matches!(err, AppError::ConfigIo { path: p, .. } if p == path));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        TokioFs::write(&path, "upload = 3").await.unwrap();

        let err = Config::load_from(&path).await.unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }
}
