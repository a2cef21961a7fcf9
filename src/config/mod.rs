//! User configuration for agenticc
//!
//! Optional settings live in a TOML file, by default `~/.agenticc/config.toml`
//! (`%LOCALAPPDATA%\agenticc\config.toml` on Windows). A different file can be
//! chosen with `--config` or `AGENTICC_CONFIG`. A missing file means defaults.
//!
//! ```toml
//! # Template source used instead of the bundled copy
//! template = "~/agents/agent_main.rs"
//!
//! # Extra locations searched when the bundled copy is unavailable
//! template_paths = ["$HOME/.agenticc/templates/agent_main.rs"]
//!
//! # cargo executable; looked up on PATH when unset
//! cargo = "~/.cargo/bin/cargo"
//!
//! # Fail instead of warning when a template slot is missing
//! strict_slots = false
//!
//! # Model used when --model and AGENTICC_MODEL are both absent
//! default_model = "gpt-4o"
//! ```
//!
//! Paths may use `~` and environment variables. Settings given on the command
//! line or through the environment take precedence over the file.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::AgenticcError;
use crate::utils::platform::{get_home_dir, resolve_path};

/// Contents of the agenticc config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgenticcConfig {
    /// Template source override
    pub template: Option<String>,

    /// Additional template candidates, searched before the built-in fallbacks
    pub template_paths: Vec<String>,

    /// Path to the cargo executable
    pub cargo: Option<String>,

    pub strict_slots: bool,

    pub default_model: Option<String>,
}

impl AgenticcConfig {
    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("agenticc")
        } else {
            get_home_dir()?.join(".agenticc")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the default configuration.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match Self::default_path() {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!(target: "config", "No default config location: {}", e);
                    return Ok(Self::default());
                }
            },
        };

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!(target: "config", "No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file, which must exist.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AgenticcError::ConfigError {
                message: format!("Failed to read config from {}: {e}", path.display()),
            }
        })?;
        let config = Self::parse(&content).map_err(|e| AgenticcError::ConfigError {
            message: format!("Failed to parse config from {}: {e}", path.display()),
        })?;
        tracing::debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Expanded template override path.
    pub fn template_override(&self) -> Result<Option<PathBuf>> {
        self.template.as_deref().map(resolve_path).transpose()
    }

    /// Expanded extra template candidates, in file order.
    pub fn template_candidates(&self) -> Result<Vec<PathBuf>> {
        self.template_paths.iter().map(|p| resolve_path(p)).collect()
    }

    /// Expanded cargo path.
    pub fn cargo_path(&self) -> Result<Option<PathBuf>> {
        self.cargo.as_deref().map(resolve_path).transpose()
    }
}
