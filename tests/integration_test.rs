/// End-to-end integration tests for newprompt
///
/// These tests verify complete workflows: allocate → save chat → render
mod common;

use std::fs;

use chrono::NaiveDate;
use newprompt::models::{CHAT_HISTORY_JSONL, CHAT_HISTORY_MD, PROMPT_FILE, PromptDirName};
use newprompt::session::{continue_session, find_latest_session, find_session, session_info};
use newprompt::{PromptError, allocate, render, save_chat};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::{WorkspaceBuilder, realistic_transcript};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()
}

const REALISTIC_MARKDOWN: &str = "# Chat History

### User
*2026-02-17 10:00:00 UTC*

Fix the login bug

### Assistant
*2026-02-17 10:00:05 UTC*

Let me look at the auth module.

**Tool: `Read`**

```json
{
  \"file_path\": \"src/auth.py\"
}
```

**Result:**

```
def login():
    pass
```

### Assistant
*2026-02-17 10:01:00 UTC*

Fixed.
";

#[test]
fn test_e2e_allocate_save_and_render() {
    let session_id = Uuid::new_v4();
    let workspace = WorkspaceBuilder::new();
    let history = workspace.history_dir();
    let projects = workspace.projects_dir();
    let _workspace =
        workspace.with_session_log(&session_id.to_string(), &realistic_transcript()).build();

    let dir = allocate(&history, date(), None, &["fix", "login"], Some(session_id)).unwrap();
    assert_eq!(dir.name.to_string(), "2-17-26-1-fix-login");
    assert_eq!(dir.session_id(), Some(session_id.to_string()));

    let saved = save_chat(&session_id.to_string(), &dir.path, &projects).unwrap();
    assert_eq!(saved.jsonl_path, dir.path.join(CHAT_HISTORY_JSONL));
    assert_eq!(saved.markdown_path, dir.path.join(CHAT_HISTORY_MD));
    assert_eq!(saved.bytes, fs::metadata(&saved.jsonl_path).unwrap().len());

    // The copy is byte-identical to the source log
    let source = fs::read(projects.join(format!("{}.jsonl", session_id))).unwrap();
    assert_eq!(fs::read(&saved.jsonl_path).unwrap(), source);

    assert_eq!(fs::read_to_string(&saved.markdown_path).unwrap(), REALISTIC_MARKDOWN);
    // Rendering the copy again gives the same document
    assert_eq!(render(&saved.jsonl_path).unwrap(), REALISTIC_MARKDOWN);
}

#[test]
fn test_e2e_sequences_count_up_per_day() {
    let workspace = WorkspaceBuilder::new().build();
    let history = workspace.path().join("history");

    let names: Vec<String> = ["alpha", "beta", "gamma"]
        .iter()
        .map(|kw| allocate(&history, date(), None, &[*kw], None).unwrap().name.to_string())
        .collect();

    assert_eq!(names, vec!["2-17-26-1-alpha", "2-17-26-2-beta", "2-17-26-3-gamma"]);

    // A new day starts over at 1
    let next_day = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
    let dir = allocate(&history, next_day, None, &["delta"], None).unwrap();
    assert_eq!(dir.name.to_string(), "2-18-26-1-delta");
}

#[test]
fn test_e2e_sequence_follows_highest_existing() {
    let workspace = WorkspaceBuilder::new()
        .with_prompt_dir("2-17-26-1-first", None)
        .with_prompt_dir("2-17-26-7-seventh", None)
        .with_prompt_dir("2-16-26-9-yesterday", None)
        .with_other_dir("notes")
        .build();
    let history = workspace.path().join("history");

    let dir = allocate(&history, date(), None, &["next"], None).unwrap();
    assert_eq!(dir.name, PromptDirName::new(date(), 8, "next"));
}

#[test]
fn test_e2e_explicit_sequence_collision_leaves_existing_untouched() {
    let workspace = WorkspaceBuilder::new().with_prompt_dir("2-17-26-3-taken", None).build();
    let history = workspace.path().join("history");
    let existing = history.join("2-17-26-3-taken").join(PROMPT_FILE);

    let err = allocate(&history, date(), Some(3), &["taken"], None).unwrap_err();

    assert!(matches!(err, PromptError::AlreadyExists { .. }));
    assert_eq!(fs::read_to_string(existing).unwrap(), "prompt\n");
}

#[test]
fn test_e2e_save_chat_without_log_keeps_prompt_dir() {
    let workspace = WorkspaceBuilder::new();
    let history = workspace.history_dir();
    let projects = workspace.projects_dir();
    let _workspace = workspace.build();

    let dir = allocate(&history, date(), None, &["no", "log"], None).unwrap();
    let err = save_chat("missing-session", &dir.path, &projects).unwrap_err();

    assert!(matches!(err, PromptError::HistoryNotFound { .. }));
    assert!(err.to_string().starts_with("Chat history not found at "));
    assert!(dir.prompt_path().is_file());
    assert!(!dir.path.join(CHAT_HISTORY_JSONL).exists());
    assert!(!dir.path.join(CHAT_HISTORY_MD).exists());
}

#[test]
fn test_e2e_resume_by_name_id_and_keyword() {
    let workspace = WorkspaceBuilder::new()
        .with_prompt_dir("2-16-26-1-refactor-parser", Some("id-parser"))
        .with_prompt_dir("2-17-26-1-fix-auth", Some("id-auth"))
        .with_prompt_dir("2-17-26-2-no-session", None)
        .build();
    let history = workspace.path().join("history");

    let by_name = find_session("2-17-26-1-fix-auth", &history).unwrap().unwrap();
    assert_eq!(by_name.session_id, "id-auth");

    let by_id = find_session("id-parser", &history).unwrap().unwrap();
    assert_eq!(by_id.dir, history.join("2-16-26-1-refactor-parser"));

    let by_keyword = find_session("parser", &history).unwrap().unwrap();
    assert_eq!(by_keyword.session_id, "id-parser");

    // Directories without a stored session id cannot be resumed
    assert!(find_session("no-session", &history).unwrap().is_none());
}

#[test]
fn test_e2e_continue_latest_session() {
    let workspace = WorkspaceBuilder::new()
        .with_prompt_dir("9-28-25-4-older", None)
        .with_prompt_dir("10-01-25-1-newest", None)
        .build();
    let history = workspace.path().join("history");

    // October is later than September even though "10" sorts first as text
    let latest = find_latest_session(&history, None).unwrap();
    assert_eq!(latest, history.join("10-01-25-1-newest"));

    let second = continue_session(&latest, "Now add tests").unwrap();
    assert_eq!(second.index, 2);
    assert!(second.prompt_path.ends_with("prompt2.md"));
    let text = fs::read_to_string(&second.prompt_path).unwrap();
    assert!(text.starts_with("Now add tests\n\n"));
    assert!(text.contains("plan2.md"));

    let info = session_info(&latest).unwrap();
    assert_eq!(info.prompts, vec!["prompt.md", "prompt2.md"]);
    assert_eq!(info.next_prompt_index, 3);
}
