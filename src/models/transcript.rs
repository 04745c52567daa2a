use chrono::{DateTime, Utc};
use serde_json::Value;

/// What a transcript line represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Assistant,
    /// A user-role line that only carries tool results
    ToolResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    Thinking(String),
    ToolUse { id: Option<String>, name: String, input: Value },
    ToolResult { tool_use_id: Option<String>, content: String, is_error: bool },
}

/// One well-formed conversational line of an assistant log
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub kind: RecordKind,
    pub timestamp: Option<DateTime<Utc>>,
    pub blocks: Vec<ContentBlock>,
}

impl TranscriptRecord {
    pub fn text(kind: RecordKind, text: impl Into<String>) -> Self {
        Self { kind, timestamp: None, blocks: vec![ContentBlock::Text(text.into())] }
    }
}
