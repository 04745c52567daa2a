use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::marker::{clear_marker, write_marker};
use super::save::{SavedChat, save_chat};
use crate::error::PromptError;

/// Set by the assistant inside its own sessions; removed so a launch from within one works
const NESTED_SESSION_VAR: &str = "CLAUDECODE";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub command: String,
    pub skip_permissions: bool,
    /// Directory the assistant writes `{session_id}.jsonl` into
    pub projects_dir: PathBuf,
    pub marker_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Start a fresh session with a known id
    New,
    /// Reopen an earlier session
    Resume,
}

#[derive(Debug)]
pub struct LaunchOutcome {
    pub status: ExitStatus,
    /// `None` when the assistant left no log for the session
    pub saved: Option<SavedChat>,
    /// Where the log was expected, for the manual `save-chat` hint
    pub expected_log: Option<PathBuf>,
}

/// Builds the assistant command line for a session
pub fn build_command(options: &LaunchOptions, mode: SessionMode, session_id: &str) -> Command {
    let mut command = Command::new(&options.command);
    if options.skip_permissions {
        command.arg("--dangerously-skip-permissions");
    }
    let flag = match mode {
        SessionMode::New => "--session-id",
        SessionMode::Resume => "--resume",
    };
    command.arg(flag).arg(session_id).env_remove(NESTED_SESSION_VAR);
    command
}

/// Runs the assistant for `session_id` and, once it exits, saves the chat into `prompt_dir`
///
/// Waits for the process without a timeout. A missing log afterwards is not an
/// error: the outcome reports where it was expected instead.
pub fn launch(
    prompt_dir: &Path,
    session_id: &str,
    mode: SessionMode,
    options: &LaunchOptions,
) -> Result<LaunchOutcome> {
    if let Some(marker) = &options.marker_path {
        write_marker(marker, prompt_dir)?;
    }

    info!(session_id, command = %options.command, ?mode, "Launching assistant");
    let status = build_command(options, mode, session_id)
        .status()
        .with_context(|| format!("Failed to launch `{}`", options.command));

    if let Some(marker) = &options.marker_path
        && let Err(e) = clear_marker(marker)
    {
        warn!(error = %e, "Could not clear session marker");
    }
    let status = status?;

    if !status.success() {
        warn!(%status, "Assistant exited unsuccessfully");
    }

    match save_chat(session_id, prompt_dir, &options.projects_dir) {
        Ok(saved) => Ok(LaunchOutcome { status, saved: Some(saved), expected_log: None }),
        Err(PromptError::HistoryNotFound { path }) => {
            warn!(path = %path.display(), "Chat history not found after session");
            Ok(LaunchOutcome { status, saved: None, expected_log: Some(path) })
        }
        Err(e) => Err(e.into()),
    }
}
