//! # Configuration Management
//!
//! Handles the `agile.toml` configuration file and the XDG-aware directories
//! it lives in.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::url::DEFAULT_AGILE_API_PATH;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "agile.toml";

/// Represents the configuration directories for the agile application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub cache_dir: Option<PathBuf>,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("dev", "agile", "agile").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      cache_dir: Some(proj_dirs.cache_dir().to_path_buf()),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the cache directory
  pub fn cache_dir(&self) -> Option<&PathBuf> {
    self.cache_dir.as_ref()
  }

  /// Initialize the configuration directories
  pub fn init(&self) -> Result<()> {
    fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
    if let Some(cache_dir) = &self.cache_dir {
      fs::create_dir_all(cache_dir).context("Failed to create cache directory")?;
    }
    Ok(())
  }

  /// Get the path to the configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }

  /// Load the configuration file, falling back to defaults when it is missing
  pub fn load_config(&self) -> Result<AgileConfig> {
    AgileConfig::load(&self.config_path())
  }

  /// Save the configuration file, creating the config directory if needed
  pub fn save_config(&self, config: &AgileConfig) -> Result<()> {
    config.save(&self.config_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Settings read from `agile.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgileConfig {
  /// Jira host used when neither `--host` nor `JIRA_HOST` is given
  pub jira_host: Option<String>,
  /// Agile REST API path relative to the host
  pub api_path: String,
  /// Per-request timeout in seconds; no timeout when unset
  pub timeout_secs: Option<u64>,
  /// Default `maxResults` for list commands
  pub page_size: Option<u32>,
}

impl Default for AgileConfig {
  fn default() -> Self {
    Self {
      jira_host: None,
      api_path: DEFAULT_AGILE_API_PATH.to_string(),
      timeout_secs: None,
      page_size: None,
    }
  }
}

impl AgileConfig {
  /// Load configuration from `path` or return defaults when it doesn't exist
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      tracing::debug!("No config file at {}, using defaults", path.display());
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Save configuration to `path`
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
  }

  /// Request timeout as a [`Duration`]
  pub fn timeout(&self) -> Option<Duration> {
    self.timeout_secs.map(Duration::from_secs)
  }
}
