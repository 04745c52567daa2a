//! Persistent user configuration
//!
//! Stored as pretty-printed JSON, by default at:
//! - Linux: `~/.config/newprompt/config.json`
//! - macOS: `~/Library/Application Support/newprompt/config.json`
//! - Windows: `%APPDATA%\newprompt\config.json`
//!
//! The file only holds what the user chose to persist; [`resolve`] combines it
//! with command-line flags, environment variables and built-in defaults.

pub mod resolve;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use resolve::{CliOverrides, Settings, config_path, resolve};

pub const APP_DIR: &str = "newprompt";
pub const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects_dir: Option<PathBuf>,
    /// Launch the assistant after every `new` unless `--no-launch` is given
    pub always_launch: bool,
    /// Pass `--dangerously-skip-permissions` when launching
    pub skip_permissions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claude_command: Option<String>,
}

/// Loads the config file, falling back to defaults when it does not exist
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Saves the config file atomically (temp file + rename), creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    let temp = path.with_extension("json.tmp");
    fs::write(&temp, json).context("Failed to write config temp file")?;
    fs::rename(&temp, path).context("Failed to rename config temp file")?;

    Ok(())
}
