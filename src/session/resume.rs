use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::read_session_id;

/// Which rule matched a resume query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    DirectoryName,
    SessionId,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMatch {
    pub session_id: String,
    pub dir: PathBuf,
    pub kind: MatchKind,
}

struct Candidate {
    name: String,
    dir: PathBuf,
    session_id: String,
}

/// Finds the prompt directory and session id a resume query refers to
///
/// The query is tried, in order, as a directory name (or path), as a stored
/// session id, and as a substring of directory names. The first match wins;
/// only directories with a stored session id are considered.
pub fn find_session(query: &str, history_dir: &Path) -> Result<Option<SessionMatch>> {
    let query = query.trim().trim_end_matches('/');
    if query.is_empty() || !history_dir.is_dir() {
        return Ok(None);
    }

    let candidates = session_candidates(history_dir)?;
    let query_name = Path::new(query).file_name().and_then(|n| n.to_str()).unwrap_or(query);

    if let Some(c) = candidates.iter().find(|c| c.name == query_name) {
        return Ok(Some(c.to_match(MatchKind::DirectoryName)));
    }

    if let Some(c) = candidates.iter().find(|c| c.session_id == query) {
        return Ok(Some(c.to_match(MatchKind::SessionId)));
    }

    let keyword_matches: Vec<&Candidate> =
        candidates.iter().filter(|c| c.name.contains(query)).collect();
    if keyword_matches.len() > 1 {
        let names: Vec<&str> = keyword_matches.iter().map(|c| c.name.as_str()).collect();
        warn!(query, matches = ?names, "Several prompt directories match; using the first");
    }

    Ok(keyword_matches.first().map(|c| c.to_match(MatchKind::Keyword)))
}

impl Candidate {
    fn to_match(&self, kind: MatchKind) -> SessionMatch {
        debug!(dir = %self.dir.display(), ?kind, "Resolved resume query");
        SessionMatch { session_id: self.session_id.clone(), dir: self.dir.clone(), kind }
    }
}

/// Directories under `history_dir` that hold a session id, sorted by name
fn session_candidates(history_dir: &Path) -> Result<Vec<Candidate>> {
    let entries = fs::read_dir(history_dir)
        .with_context(|| format!("Failed to read history directory: {}", history_dir.display()))?;

    let mut candidates: Vec<Candidate> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|dir| {
            let name = dir.file_name()?.to_str()?.to_string();
            let session_id = read_session_id(&dir)?;
            Some(Candidate { name, dir, session_id })
        })
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(candidates)
}
