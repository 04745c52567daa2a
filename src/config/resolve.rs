//! Layered resolution of effective settings
//!
//! Each setting is taken from the first layer that provides it:
//! command-line flag, then environment variable, then config file, then the
//! built-in default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{APP_DIR, CONFIG_FILENAME, Config};
use crate::utils::{Environment, project_slug};

pub const ENV_CONFIG: &str = "NEWPROMPT_CONFIG";
pub const ENV_HISTORY_DIR: &str = "NEWPROMPT_HISTORY_DIR";
pub const ENV_PROJECTS_DIR: &str = "NEWPROMPT_PROJECTS_DIR";
pub const ENV_CLAUDE_BIN: &str = "NEWPROMPT_CLAUDE_BIN";

const DEFAULT_HISTORY_DIRNAME: &str = "ClaudeCode_PromptHistory";
const DEFAULT_CLAUDE_COMMAND: &str = "claude";
const MARKER_FILENAME: &str = "current_session";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub history_dir: Option<PathBuf>,
    pub projects_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Effective settings after all layers are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub history_dir: PathBuf,
    /// Where the assistant writes `{session_id}.jsonl` for the current project
    pub projects_dir: PathBuf,
    pub claude_command: String,
    pub always_launch: bool,
    pub skip_permissions: bool,
    /// Records the prompt directory of a session that is currently running
    pub marker_path: PathBuf,
}

/// Location of the config file: `--config`, then `NEWPROMPT_CONFIG`, then the platform default
pub fn config_path(overrides: &CliOverrides, env: &Environment) -> Result<PathBuf> {
    if let Some(path) = &overrides.config {
        return Ok(path.clone());
    }
    if let Some(path) = env.var(ENV_CONFIG) {
        return Ok(PathBuf::from(path));
    }

    let base = match &env.config_dir {
        Some(dir) => dir.clone(),
        None => env
            .home
            .as_ref()
            .map(|home| home.join(".config"))
            .context("Failed to locate a config directory")?,
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Resolves effective settings from the command line, environment and config file
pub fn resolve(
    overrides: &CliOverrides,
    env: &Environment,
    file: &Config,
    config_path: &Path,
) -> Result<Settings> {
    let history_dir =
        first_path(&overrides.history_dir, env.var(ENV_HISTORY_DIR), &file.history_dir);
    let history_dir = match history_dir {
        Some(dir) => dir,
        None => env
            .home
            .as_ref()
            .map(|home| home.join(DEFAULT_HISTORY_DIRNAME))
            .context("HOME environment variable not set; pass --history-dir")?,
    };

    let projects_dir =
        match first_path(&overrides.projects_dir, env.var(ENV_PROJECTS_DIR), &file.projects_dir) {
            Some(dir) => dir,
            None => env.claude_dir()?.join("projects").join(project_slug(&env.cwd)),
        };

    let claude_command = env
        .var(ENV_CLAUDE_BIN)
        .map(str::to_string)
        .or_else(|| file.claude_command.clone())
        .unwrap_or_else(|| DEFAULT_CLAUDE_COMMAND.to_string());

    let marker_path = config_path
        .parent()
        .map(|dir| dir.join(MARKER_FILENAME))
        .unwrap_or_else(|| PathBuf::from(MARKER_FILENAME));

    Ok(Settings {
        history_dir,
        projects_dir,
        claude_command,
        always_launch: file.always_launch,
        skip_permissions: file.skip_permissions,
        marker_path,
    })
}

fn first_path(
    flag: &Option<PathBuf>,
    env: Option<&str>,
    file: &Option<PathBuf>,
) -> Option<PathBuf> {
    flag.clone().or_else(|| env.map(PathBuf::from)).or_else(|| file.clone())
}
