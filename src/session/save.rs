use std::fs::{self, File, FileTimes};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{PromptError, PromptResult};
use crate::models::{CHAT_HISTORY_JSONL, CHAT_HISTORY_MD};
use crate::render::render_reader;

/// Files written into a prompt directory by [`save_chat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedChat {
    pub jsonl_path: PathBuf,
    pub markdown_path: PathBuf,
    /// Size of the copied log
    pub bytes: u64,
}

/// Where the assistant writes the log for a session
pub fn source_log_path(projects_dir: &Path, session_id: &str) -> PathBuf {
    projects_dir.join(format!("{}.jsonl", session_id))
}

/// Copies a session's log into a prompt directory and renders it to Markdown
///
/// The copy is a plain file copy rather than a link, so the history survives the
/// assistant cleaning up its own files. An earlier copy is replaced.
///
/// # Errors
///
/// - [`PromptError::InvalidSessionId`] if the id holds anything besides letters,
///   digits, `-` and `_`
/// - [`PromptError::SessionDirNotFound`] if `prompt_dir` is not a directory
/// - [`PromptError::HistoryNotFound`] if the session log does not exist; the
///   prompt directory is left untouched and stays usable
/// - [`PromptError::Io`] if copying or writing fails
pub fn save_chat(
    session_id: &str,
    prompt_dir: &Path,
    projects_dir: &Path,
) -> PromptResult<SavedChat> {
    if !is_plain_session_id(session_id) {
        return Err(PromptError::InvalidSessionId { id: session_id.to_string() });
    }
    if !prompt_dir.is_dir() {
        return Err(PromptError::SessionDirNotFound { path: prompt_dir.to_path_buf() });
    }

    let source = source_log_path(projects_dir, session_id);
    if !source.is_file() {
        return Err(PromptError::HistoryNotFound { path: source });
    }

    let jsonl_path = prompt_dir.join(CHAT_HISTORY_JSONL);
    if jsonl_path.exists() {
        fs::remove_file(&jsonl_path).map_err(|e| {
            PromptError::io(format!("Failed to replace {}", jsonl_path.display()), e)
        })?;
    }

    let bytes = fs::copy(&source, &jsonl_path).map_err(|e| {
        PromptError::io(format!("Failed to copy chat history from {}", source.display()), e)
    })?;
    if let Err(e) = copy_file_times(&source, &jsonl_path) {
        warn!(
            error = %e,
            path = %jsonl_path.display(),
            "Could not preserve chat history timestamps"
        );
    }

    let file = File::open(&jsonl_path)
        .map_err(|e| PromptError::io(format!("Failed to open {}", jsonl_path.display()), e))?;
    let markdown = render_reader(BufReader::new(file));

    let markdown_path = prompt_dir.join(CHAT_HISTORY_MD);
    fs::write(&markdown_path, markdown)
        .map_err(|e| PromptError::io(format!("Failed to write {}", markdown_path.display()), e))?;

    info!(session_id, bytes, dir = %prompt_dir.display(), "Saved chat history");
    Ok(SavedChat { jsonl_path, markdown_path, bytes })
}

/// Letters, digits, `-` and `_` only; the id becomes a file name under the projects directory
fn is_plain_session_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn copy_file_times(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(dest)?.set_times(times)
}
