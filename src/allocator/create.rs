use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use super::naming::plan_name;
use super::template::prompt_template;
use crate::error::{PromptError, PromptResult};
use crate::models::{PromptDirectory, SESSION_ID_FILE};

/// Allocates and creates a new prompt directory under `parent`
///
/// The directory gets `prompt.md` and, when `session_id` is given, `.session_id`.
/// Without `explicit_seq` the next free sequence for `date` is used.
///
/// # Errors
///
/// - [`PromptError::EmptyKeywords`] if the keywords contain nothing alphanumeric
/// - [`PromptError::SequenceExhausted`] if no sequence number is left for `date`
/// - [`PromptError::AlreadyExists`] if the directory is already there; nothing is written
/// - [`PromptError::Io`] if the parent cannot be created or the files cannot be written;
///   a directory created by this call is removed again
pub fn allocate<S: AsRef<str>>(
    parent: &Path,
    date: NaiveDate,
    explicit_seq: Option<u32>,
    keywords: &[S],
    session_id: Option<Uuid>,
) -> PromptResult<PromptDirectory> {
    let name = plan_name(parent, date, explicit_seq, keywords)?;
    let path = parent.join(name.to_string());

    if path.exists() {
        return Err(PromptError::AlreadyExists { path });
    }

    fs::create_dir_all(parent).map_err(|e| {
        PromptError::io(format!("Failed to create history directory {}", parent.display()), e)
    })?;

    // Non-recursive create, so a directory appearing since the check is still refused
    match fs::create_dir(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(PromptError::AlreadyExists { path });
        }
        Err(e) => {
            return Err(PromptError::io(
                format!("Failed to create prompt directory {}", path.display()),
                e,
            ));
        }
    }

    let dir = PromptDirectory { path, name };
    populate(&dir, session_id)?;

    info!(dir = %dir.path.display(), "Created prompt directory");
    Ok(dir)
}

/// Writes the initial files into a just-created directory, removing it again on failure
fn populate(dir: &PromptDirectory, session_id: Option<Uuid>) -> PromptResult<()> {
    let result = write_initial_files(dir, session_id);
    if result.is_err()
        && let Err(e) = fs::remove_dir_all(&dir.path)
    {
        warn!(
            error = %e,
            dir = %dir.path.display(),
            "Could not remove incomplete prompt directory"
        );
    }
    result
}

fn write_initial_files(dir: &PromptDirectory, session_id: Option<Uuid>) -> PromptResult<()> {
    let prompt_path = dir.prompt_path();
    fs::write(&prompt_path, prompt_template("", &dir.plan_path())).map_err(|e| {
        PromptError::io(format!("Failed to write {}", prompt_path.display()), e)
    })?;

    if let Some(session_id) = session_id {
        write_session_id(&dir.path, &session_id)?;
    }
    Ok(())
}

/// Writes (or replaces) `.session_id` in a prompt directory
pub fn write_session_id(dir: &Path, session_id: &Uuid) -> PromptResult<()> {
    let path = dir.join(SESSION_ID_FILE);
    fs::write(&path, session_id.to_string())
        .map_err(|e| PromptError::io(format!("Failed to write {}", path.display()), e))
}
