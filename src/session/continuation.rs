use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::marker::read_marker;
use crate::allocator::prompt_template;
use crate::error::{PromptError, PromptResult};
use crate::models::{PROMPT_FILE, PromptDirName};

const PROMPT_STEM: &str = "prompt";
const PLAN_STEM: &str = "plan";

/// A follow-up prompt written into an existing session directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuedPrompt {
    pub index: u32,
    pub prompt_path: PathBuf,
    pub plan_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub name: String,
    pub dir: PathBuf,
    pub prompts: Vec<String>,
    pub plans: Vec<String>,
    pub next_prompt_index: u32,
}

/// `prompt.md` for index 1, `prompt{N}.md` after that
pub fn indexed_file_name(stem: &str, index: u32) -> String {
    if index <= 1 {
        format!("{}.md", stem)
    } else {
        format!("{}{}.md", stem, index)
    }
}

/// Index of a `{stem}.md` / `{stem}{N}.md` file name
fn file_index(file_name: &str, stem: &str) -> Option<u32> {
    let digits = file_name.strip_prefix(stem)?.strip_suffix(".md")?;
    if digits.is_empty() {
        return Some(1);
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Files in `dir` named like `{stem}.md` / `{stem}{N}.md`, ordered by index
fn indexed_files(dir: &Path, stem: &str) -> PromptResult<Vec<(u32, String)>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| PromptError::io(format!("Failed to read {}", dir.display()), e))?;

    let mut files: Vec<(u32, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((file_index(&name, stem)?, name))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Next free prompt index in a session directory (1 when it has no prompts)
pub fn next_prompt_index(dir: &Path) -> PromptResult<u32> {
    let highest = indexed_files(dir, PROMPT_STEM)?.last().map(|(index, _)| *index).unwrap_or(0);
    Ok(highest + 1)
}

/// Writes prompt number `index` into `dir`, refusing to overwrite an existing one
pub fn write_indexed_prompt(dir: &Path, index: u32, text: &str) -> PromptResult<ContinuedPrompt> {
    let prompt_path = dir.join(indexed_file_name(PROMPT_STEM, index));
    let plan_path = dir.join(indexed_file_name(PLAN_STEM, index));

    if prompt_path.exists() {
        return Err(PromptError::AlreadyExists { path: prompt_path });
    }

    fs::write(&prompt_path, prompt_template(text, &plan_path))
        .map_err(|e| PromptError::io(format!("Failed to write {}", prompt_path.display()), e))?;

    Ok(ContinuedPrompt { index, prompt_path, plan_path })
}

/// Adds the next prompt to a session directory
pub fn continue_session(dir: &Path, text: &str) -> PromptResult<ContinuedPrompt> {
    if !dir.is_dir() {
        return Err(PromptError::SessionDirNotFound { path: dir.to_path_buf() });
    }

    let index = next_prompt_index(dir)?;
    let prompt = write_indexed_prompt(dir, index, text)?;
    info!(index, dir = %dir.display(), "Wrote continuation prompt");
    Ok(prompt)
}

pub fn session_info(dir: &Path) -> PromptResult<SessionInfo> {
    if !dir.is_dir() {
        return Err(PromptError::SessionDirNotFound { path: dir.to_path_buf() });
    }

    let prompts = indexed_files(dir, PROMPT_STEM)?;
    let next_prompt_index = prompts.last().map(|(index, _)| index + 1).unwrap_or(1);

    Ok(SessionInfo {
        name: dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
        dir: dir.to_path_buf(),
        prompts: prompts.into_iter().map(|(_, name)| name).collect(),
        plans: indexed_files(dir, PLAN_STEM)?.into_iter().map(|(_, name)| name).collect(),
        next_prompt_index,
    })
}

/// The session a command should default to
///
/// A live session marker wins; otherwise the most recent prompt directory (by
/// date, then sequence) that has a `prompt.md`. Names starting with `_` are skipped.
pub fn find_latest_session(history_dir: &Path, marker: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = marker.and_then(read_marker) {
        return Some(dir);
    }

    fs::read_dir(history_dir)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = path.file_name()?.to_str()?;
            if name.starts_with('_') || !path.join(PROMPT_FILE).is_file() {
                return None;
            }
            let parsed = PromptDirName::parse(name)?;
            Some((parsed.sort_key(), path))
        })
        .max()
        .map(|(_, path)| path)
}
