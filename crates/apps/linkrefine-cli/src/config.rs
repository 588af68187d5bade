//! CLI configuration.
//!
//! The file holds a `[refine]` table with the engine settings (selection
//! thresholds, link policy, scan options and the persisted skip-list) and a
//! `[display]` table for terminal output.

use std::path::{Path, PathBuf};

use linkrefine_graph::RefineConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "LINKREFINE_CONFIG_DIR";

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Engine configuration.
    pub refine: RefineConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load configuration from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.refine.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Unchanged lines shown around each change in a diff.
    pub context_lines: usize,
    /// Show the candidate's own content before reviewing its backlinks.
    pub show_candidate: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            context_lines: 3,
            show_candidate: true,
        }
    }
}

/// Get the directory holding the configuration file.
///
/// Priority:
/// 1. `LINKREFINE_CONFIG_DIR` environment variable (if set)
/// 2. Platform-specific config directory (e.g., `~/.config/linkrefine` on Linux)
/// 3. Fallback to `~/.linkrefine`
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "linkrefine")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".linkrefine")
        })
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}
