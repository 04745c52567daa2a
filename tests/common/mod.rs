//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Builder for a scratch home with a prompt history root and a projects dir
pub struct WorkspaceBuilder {
    temp_dir: TempDir,
}

impl WorkspaceBuilder {
    /// Create a new builder with empty `history/` and `projects/` directories
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("history")).expect("Failed to create history dir");
        fs::create_dir(temp_dir.path().join("projects")).expect("Failed to create projects dir");
        Self { temp_dir }
    }

    pub fn history_dir(&self) -> PathBuf {
        self.temp_dir.path().join("history")
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.temp_dir.path().join("projects")
    }

    /// Add a prompt directory with a `prompt.md` and, optionally, a stored session id
    pub fn with_prompt_dir(self, name: &str, session_id: Option<&str>) -> Self {
        let dir = self.history_dir().join(name);
        fs::create_dir(&dir).expect("Failed to create prompt dir");
        fs::write(dir.join("prompt.md"), "prompt\n").expect("Failed to write prompt.md");
        if let Some(id) = session_id {
            fs::write(dir.join(".session_id"), format!("{}\n", id))
                .expect("Failed to write .session_id");
        }
        self
    }

    /// Add a plain directory under the history root (not a prompt directory)
    pub fn with_other_dir(self, name: &str) -> Self {
        fs::create_dir(self.history_dir().join(name)).expect("Failed to create dir");
        self
    }

    /// Add the assistant's log for a session
    pub fn with_session_log(self, session_id: &str, transcript: &TranscriptBuilder) -> Self {
        let path = self.projects_dir().join(format!("{}.jsonl", session_id));
        fs::write(path, transcript.to_jsonl()).expect("Failed to write session log");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for assistant transcript (JSONL) content
#[derive(Default)]
pub struct TranscriptBuilder {
    lines: Vec<String>,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A user turn with plain string content
    pub fn user(mut self, text: &str, timestamp: &str) -> Self {
        self.lines.push(format!(
            r#"{{"type":"user","message":{{"role":"user","content":{}}},"timestamp":"{}"}}"#,
            json_string(text),
            timestamp
        ));
        self
    }

    /// An assistant turn made of the given content blocks
    pub fn assistant(mut self, blocks: &[String], timestamp: &str) -> Self {
        self.lines.push(format!(
            r#"{{"type":"assistant","message":{{"role":"assistant","content":[{}]}},"timestamp":"{}"}}"#,
            blocks.join(","),
            timestamp
        ));
        self
    }

    /// A user line carrying a tool result
    pub fn tool_result(mut self, tool_use_id: &str, content: &str, is_error: bool) -> Self {
        self.lines.push(format!(
            r#"{{"type":"user","message":{{"role":"user","content":[{{"type":"tool_result","tool_use_id":"{}","content":{},"is_error":{}}}]}}}}"#,
            tool_use_id,
            json_string(content),
            is_error
        ));
        self
    }

    /// A bookkeeping line the renderer ignores
    pub fn summary(mut self, summary: &str) -> Self {
        self.lines.push(format!(r#"{{"type":"summary","summary":{}}}"#, json_string(summary)));
        self
    }

    /// A raw line, written as given
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn to_jsonl(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    pub fn write_to(&self, path: &Path) {
        fs::write(path, self.to_jsonl()).expect("Failed to write transcript");
    }
}

pub fn text_block(text: &str) -> String {
    format!(r#"{{"type":"text","text":{}}}"#, json_string(text))
}

pub fn thinking_block(text: &str) -> String {
    format!(r#"{{"type":"thinking","thinking":{}}}"#, json_string(text))
}

pub fn tool_use_block(id: &str, name: &str, input_json: &str) -> String {
    format!(r#"{{"type":"tool_use","id":"{}","name":"{}","input":{}}}"#, id, name, input_json)
}

fn json_string(text: &str) -> String {
    serde_json::to_string(text).expect("Failed to encode string")
}

/// A short conversation with a tool round trip
pub fn realistic_transcript() -> TranscriptBuilder {
    TranscriptBuilder::new()
        .summary("Fixing the login flow")
        .user("Fix the login bug", "2026-02-17T10:00:00.000Z")
        .assistant(
            &[
                thinking_block("The bug is probably in auth.py"),
                text_block("Let me look at the auth module."),
                tool_use_block("toolu_1", "Read", r#"{"file_path":"src/auth.py"}"#),
            ],
            "2026-02-17T10:00:05.000Z",
        )
        .tool_result("toolu_1", "def login():\n    pass", false)
        .assistant(&[text_block("Fixed.")], "2026-02-17T10:01:00.000Z")
}
