use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::{ContentBlock, RecordKind, TranscriptRecord};

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default)]
    entry_type: Option<String>,
    #[serde(default)]
    role: Option<Value>,
    // Shapes are only checked once the line is known to be a conversation turn
    #[serde(default)]
    message: Option<Value>,
    /// Some logs put the content next to a top-level `role` instead of in `message`
    #[serde(default)]
    content: Option<Value>,
    #[serde(
        default,
        deserialize_with = "crate::parsers::deserializers::deserialize_optional_timestamp"
    )]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    // Kept as raw values so one odd block does not invalidate the whole line
    Blocks(Vec<Value>),
}

impl Default for RawContent {
    fn default() -> Self {
        Self::Blocks(Vec::new())
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: Option<bool>,
    },
    #[serde(other)]
    Unknown,
}

impl RawBlock {
    fn into_block(self) -> Option<ContentBlock> {
        match self {
            Self::Text { text } => Some(ContentBlock::Text(text)),
            Self::Thinking { thinking } => Some(ContentBlock::Thinking(thinking)),
            Self::ToolUse { id, name, input } => Some(ContentBlock::ToolUse {
                id,
                name: name.unwrap_or_else(|| "Unknown".to_string()),
                input,
            }),
            Self::ToolResult { tool_use_id, content, is_error } => Some(ContentBlock::ToolResult {
                tool_use_id,
                content: tool_result_text(&content),
                is_error: is_error.unwrap_or(false),
            }),
            Self::Unknown => None,
        }
    }
}

/// Flattens tool result content, which is either a string or a list of parts
fn tool_result_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .map(|part| match part.get("type").and_then(Value::as_str) {
                Some("text") => part.get("text").and_then(Value::as_str).unwrap_or("").to_string(),
                Some("image") => "[image]".to_string(),
                _ => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

fn blocks_from(content: RawContent) -> Vec<ContentBlock> {
    match content {
        RawContent::Text(text) => vec![ContentBlock::Text(text)],
        RawContent::Blocks(values) => values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<RawBlock>(value).ok())
            .filter_map(RawBlock::into_block)
            .collect(),
    }
}

enum LineOutcome {
    Record(TranscriptRecord),
    /// Well-formed, but not a conversational line (summary, snapshot, system, ...)
    Ignored,
    Malformed(String),
}

fn parse_line(line: &[u8]) -> LineOutcome {
    let entry: RawEntry = match serde_json::from_slice(line) {
        Ok(entry) => entry,
        Err(e) => return LineOutcome::Malformed(e.to_string()),
    };

    let kind = entry
        .entry_type
        .as_deref()
        .or_else(|| entry.message.as_ref().and_then(|m| m.get("role")).and_then(Value::as_str))
        .or_else(|| entry.role.as_ref().and_then(Value::as_str));

    let is_user = match kind {
        Some("user") => true,
        Some("assistant") => false,
        _ => return LineOutcome::Ignored,
    };

    let raw_content = match (entry.message, entry.content) {
        (Some(Value::Object(mut message)), _) => message.remove("content").unwrap_or(Value::Null),
        (Some(_), _) => return LineOutcome::Malformed("message is not an object".to_string()),
        (None, Some(content)) => content,
        (None, None) => {
            return LineOutcome::Malformed("conversation line has no message".to_string());
        }
    };
    let content = match raw_content {
        Value::Null => RawContent::default(),
        value => match serde_json::from_value::<RawContent>(value) {
            Ok(content) => content,
            Err(e) => return LineOutcome::Malformed(e.to_string()),
        },
    };
    let blocks = blocks_from(content);

    let kind = if !is_user {
        RecordKind::Assistant
    } else if !blocks.is_empty()
        && blocks.iter().all(|b| matches!(b, ContentBlock::ToolResult { .. }))
    {
        RecordKind::ToolResult
    } else {
        RecordKind::User
    };

    LineOutcome::Record(TranscriptRecord { kind, timestamp: entry.timestamp, blocks })
}

/// Lazy reader over the records of a line-delimited transcript
///
/// Malformed lines are logged and skipped; reading always continues with the
/// next line. A read error from the underlying source ends the iteration.
pub struct TranscriptReader<R> {
    lines: Split<R>,
    line_num: usize,
    malformed: usize,
    records: usize,
    done: bool,
}

impl<R: BufRead> TranscriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.split(b'\n'), line_num: 0, malformed: 0, records: 0, done: false }
    }

    /// Number of lines skipped as malformed so far
    pub fn malformed_lines(&self) -> usize {
        self.malformed
    }

    /// Number of records yielded so far
    pub fn records_read(&self) -> usize {
        self.records
    }
}

impl<R: BufRead> Iterator for TranscriptReader<R> {
    type Item = TranscriptRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    warn!(line = self.line_num + 1, error = %e, "Stopping transcript read");
                    self.done = true;
                    break;
                }
                None => {
                    self.done = true;
                    break;
                }
            };
            self.line_num += 1;

            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match parse_line(&line) {
                LineOutcome::Record(record) => {
                    self.records += 1;
                    return Some(record);
                }
                LineOutcome::Ignored => {}
                LineOutcome::Malformed(reason) => {
                    self.malformed += 1;
                    warn!(line = self.line_num, %reason, "Skipping malformed transcript line");
                }
            }
        }
        None
    }
}

/// Opens a transcript file for lazy reading
pub fn open_transcript(path: &Path) -> Result<TranscriptReader<BufReader<File>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open transcript file: {}", path.display()))?;
    Ok(TranscriptReader::new(BufReader::new(file)))
}
