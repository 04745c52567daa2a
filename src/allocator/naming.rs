use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{PromptError, PromptResult};
use crate::models::PromptDirName;

/// Turns keywords into the hyphenated slug part of a directory name
///
/// Lower-cases everything, treats every non-alphanumeric character as a
/// separator and drops empty tokens. Non-ASCII letters and digits are kept.
///
/// # Examples
///
/// ```
/// use newprompt::allocator::slugify;
///
/// assert_eq!(slugify(&["CNN", "debug"]), "cnn-debug");
/// assert_eq!(slugify(&["Fix  the_bug!", "--v2"]), "fix-the-bug-v2");
/// assert_eq!(slugify(&["Café", "日本語"]), "café-日本語");
/// assert_eq!(slugify(&["???"]), "");
/// ```
pub fn slugify<S: AsRef<str>>(keywords: &[S]) -> String {
    keywords
        .iter()
        .flat_map(|keyword| {
            keyword.as_ref().split(|c: char| !c.is_alphanumeric()).map(str::to_lowercase)
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `{month}-{day}-{year2}` for a date, e.g. `2-16-26`
pub fn date_prefix(date: NaiveDate) -> String {
    PromptDirName::new(date, 0, "").date_prefix()
}

/// Next free sequence number for `date` under `parent`: highest existing plus one
///
/// A missing parent directory simply has no sequences yet.
pub fn next_sequence(parent: &Path, date: NaiveDate) -> PromptResult<u32> {
    if !parent.exists() {
        return Ok(1);
    }

    let entries = fs::read_dir(parent).map_err(|e| {
        PromptError::io(format!("Failed to read history directory {}", parent.display()), e)
    })?;

    let mut max_seq: u32 = 0;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(PromptDirName::parse) else {
            continue;
        };
        if name.is_on(date) {
            max_seq = max_seq.max(name.seq);
        }
    }

    max_seq
        .checked_add(1)
        .ok_or_else(|| PromptError::SequenceExhausted { date: date_prefix(date) })
}

/// Computes the directory name an allocation would use, without creating anything
pub fn plan_name<S: AsRef<str>>(
    parent: &Path,
    date: NaiveDate,
    explicit_seq: Option<u32>,
    keywords: &[S],
) -> PromptResult<PromptDirName> {
    let slug = slugify(keywords);
    if slug.is_empty() {
        return Err(PromptError::EmptyKeywords);
    }

    let seq = match explicit_seq {
        Some(seq) => seq,
        None => next_sequence(parent, date)?,
    };
    debug!(seq, explicit = explicit_seq.is_some(), "Chose sequence number");

    Ok(PromptDirName::new(date, seq, slug))
}
