use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

pub const PROMPT_FILE: &str = "prompt.md";
pub const PLAN_FILE: &str = "plan.md";
pub const CHAT_HISTORY_JSONL: &str = "chat_history.jsonl";
pub const CHAT_HISTORY_MD: &str = "chat_history.md";
pub const SESSION_ID_FILE: &str = ".session_id";

/// Parsed form of a prompt directory name: `{month}-{day}-{year2}-{seq}-{slug}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptDirName {
    pub month: u32,
    pub day: u32,
    /// Two-digit year (`26` for 2026)
    pub year: u32,
    pub seq: u32,
    pub slug: String,
}

impl PromptDirName {
    pub fn new(date: NaiveDate, seq: u32, slug: impl Into<String>) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
            year: date.year().rem_euclid(100) as u32,
            seq,
            slug: slug.into(),
        }
    }

    /// Parses a directory name, returning `None` for anything that is not a prompt directory
    ///
    /// # Examples
    ///
    /// ```
    /// use newprompt::models::PromptDirName;
    ///
    /// let name = PromptDirName::parse("2-16-26-3-cnn-debug").unwrap();
    /// assert_eq!(name.seq, 3);
    /// assert_eq!(name.slug, "cnn-debug");
    /// assert!(PromptDirName::parse("_archive").is_none());
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        let mut parts = name.splitn(5, '-');
        let month = parse_number(parts.next()?)?;
        let day = parse_number(parts.next()?)?;
        let year = parse_number(parts.next()?)?;
        let seq = parse_number(parts.next()?)?;
        let slug = parts.next()?;

        if !(1..=12).contains(&month) || !(1..=31).contains(&day) || year > 99 || slug.is_empty()
        {
            return None;
        }

        Some(Self { month, day, year, seq, slug: slug.to_string() })
    }

    /// The `{month}-{day}-{year2}` part of the name
    pub fn date_prefix(&self) -> String {
        format!("{}-{:02}-{:02}", self.month, self.day, self.year)
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        let other = Self::new(date, 0, "");
        (self.year, self.month, self.day) == (other.year, other.month, other.day)
    }

    /// Key ordering names chronologically, then by sequence within a day
    pub fn sort_key(&self) -> (u32, u32, u32, u32) {
        (self.year, self.month, self.day, self.seq)
    }
}

impl fmt::Display for PromptDirName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.date_prefix(), self.seq, self.slug)
    }
}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// A prompt directory on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDirectory {
    pub path: PathBuf,
    pub name: PromptDirName,
}

impl PromptDirectory {
    pub fn prompt_path(&self) -> PathBuf {
        self.path.join(PROMPT_FILE)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.path.join(PLAN_FILE)
    }

    /// Stored session id, if the file exists and is not blank
    pub fn session_id(&self) -> Option<String> {
        read_session_id(&self.path)
    }
}

/// Reads `.session_id` from any directory, trimming surrounding whitespace
pub fn read_session_id(dir: &Path) -> Option<String> {
    let raw = fs::read_to_string(dir.join(SESSION_ID_FILE)).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_pads_day_and_year() {
        let name = PromptDirName::new(date(2026, 2, 6), 1, "foo");
        assert_eq!(name.to_string(), "2-06-26-1-foo");

        let name = PromptDirName::new(date(2105, 11, 30), 12, "bar-baz");
        assert_eq!(name.to_string(), "11-30-05-12-bar-baz");
    }

    #[test]
    fn test_parse_roundtrips_display() {
        let name = PromptDirName::new(date(2026, 12, 31), 7, "cnn-debug-run");
        assert_eq!(PromptDirName::parse(&name.to_string()), Some(name));

        let name = PromptDirName::new(date(2026, 3, 4), 2, "café-日本語");
        assert_eq!(PromptDirName::parse("3-04-26-2-café-日本語"), Some(name));
    }

    #[test]
    fn test_parse_rejects_non_prompt_names() {
        assert!(PromptDirName::parse("notes").is_none());
        assert!(PromptDirName::parse("2-16-26-x-foo").is_none());
        assert!(PromptDirName::parse("2-16-26-3").is_none());
        assert!(PromptDirName::parse("2-16-26-3-").is_none());
        assert!(PromptDirName::parse("13-16-26-3-foo").is_none());
        assert!(PromptDirName::parse("2-16-2026-3-foo").is_none());
        assert!(PromptDirName::parse("+2-16-26-3-foo").is_none());
    }

    #[test]
    fn test_is_on_ignores_century() {
        let name = PromptDirName::parse("2-16-26-1-foo").unwrap();
        assert!(name.is_on(date(2026, 2, 16)));
        assert!(!name.is_on(date(2026, 2, 17)));
        assert!(!name.is_on(date(2026, 12, 16)));
    }

    #[test]
    fn test_sort_key_orders_chronologically() {
        let raw = ["12-01-25-1-a", "2-16-26-10-b", "2-16-26-2-c", "1-05-26-1-d"];
        let mut names: Vec<PromptDirName> =
            raw.iter().filter_map(|n| PromptDirName::parse(n)).collect();
        names.sort_by_key(PromptDirName::sort_key);
        let ordered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["12-01-25-1-a", "1-05-26-1-d", "2-16-26-2-c", "2-16-26-10-b"]);
    }

    #[test]
    fn test_read_session_id_trims_and_ignores_blank() {
        let temp = tempfile::TempDir::new().unwrap();
        assert_eq!(read_session_id(temp.path()), None);

        fs::write(temp.path().join(SESSION_ID_FILE), "  \n").unwrap();
        assert_eq!(read_session_id(temp.path()), None);

        fs::write(temp.path().join(SESSION_ID_FILE), "abc-123\n").unwrap();
        assert_eq!(read_session_id(temp.path()), Some("abc-123".to_string()));
    }
}
