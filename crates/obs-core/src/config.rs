//! Configuration for the observer panel
//!
//! Loaded from `.obs/config.toml` (or an explicit path). Every section is
//! optional and falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::{ObsError, Result};

/// Relative location of the config file inside a project directory
pub const CONFIG_FILE: &str = ".obs/config.toml";

/// Top-level panel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Where the metrics REST API lives
    #[serde(default)]
    pub api: ApiConfig,

    /// Embedded web server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Panel loading behavior
    #[serde(default)]
    pub panel: PanelSettings,
}

/// Metrics REST API location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL; the `metrics` resource is appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Web server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to serve the panel on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Open a browser tab on startup
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelSettings {
    #[serde(default)]
    pub fetch_mode: FetchMode,
}

/// How per-metric observer lists are fetched during a reload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// One metric at a time, in list order
    #[default]
    Sequential,
    /// All at once; results are placed by metric index
    Concurrent,
}

fn default_base_url() -> String {
    "http://localhost:8170/v1".to_string()
}

fn default_port() -> u16 {
    7171
}

fn default_open_browser() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            open_browser: default_open_browser(),
        }
    }
}

impl PanelConfig {
    /// Default config file path under `root`
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load configuration from `path`, or use defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ObsError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration to `path`, creating parent directories
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| ObsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(self.api.base_url.trim()).map_err(|e| {
            ObsError::Config(format!("api.base_url '{}' is not a URL: {}", self.api.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") || !base.has_host() {
            return Err(ObsError::Config(format!(
                "api.base_url must be an absolute http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.server.port == 0 {
            return Err(ObsError::Config("server.port must be non-zero".to_string()));
        }
        Ok(())
    }
}
