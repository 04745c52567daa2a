use std::io::BufRead;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::models::{ContentBlock, RecordKind, TranscriptRecord};
use crate::parsers::{TranscriptReader, open_transcript};

pub const TITLE: &str = "# Chat History";

/// Tool results longer than this many characters are cut off
pub const MAX_TOOL_RESULT_CHARS: usize = 2000;

pub const TRUNCATION_MARKER: &str = "... (truncated)";

/// Placeholder text the assistant logs for turns without visible output
const NO_CONTENT: &str = "(no content)";

/// Renders a transcript file to Markdown
///
/// Only fails if the file cannot be opened; damaged lines are skipped.
pub fn render(path: &Path) -> Result<String> {
    let mut reader = open_transcript(path)?;
    let markdown = render_records(reader.by_ref());
    debug!(
        path = %path.display(),
        records = reader.records_read(),
        malformed = reader.malformed_lines(),
        "Rendered transcript"
    );
    Ok(markdown)
}

pub fn render_reader<R: BufRead>(reader: R) -> String {
    render_records(TranscriptReader::new(reader))
}

/// Renders records in the order given, one section per record
///
/// # Examples
///
/// ```
/// use newprompt::models::{RecordKind, TranscriptRecord};
/// use newprompt::render::render_records;
///
/// let markdown = render_records(vec![TranscriptRecord::text(RecordKind::User, "Hello")]);
/// assert_eq!(markdown, "# Chat History\n\n### User\n\nHello\n");
///
/// assert_eq!(render_records(Vec::<TranscriptRecord>::new()), "# Chat History\n");
/// ```
pub fn render_records<I>(records: I) -> String
where
    I: IntoIterator<Item = TranscriptRecord>,
{
    let mut output = format!("{}\n", TITLE);
    for record in records {
        if let Some(section) = render_record(&record) {
            output.push('\n');
            output.push_str(&section);
        }
    }
    output
}

fn render_record(record: &TranscriptRecord) -> Option<String> {
    let heading = match record.kind {
        RecordKind::User => Some("### User"),
        RecordKind::Assistant => Some("### Assistant"),
        RecordKind::ToolResult => None,
    };

    let body: Vec<String> = record.blocks.iter().filter_map(render_block).collect();
    if body.is_empty() {
        return None;
    }

    let mut parts = Vec::with_capacity(body.len() + 1);
    if let Some(heading) = heading {
        match record.timestamp {
            Some(ts) => parts.push(format!("{}\n{}", heading, format_timestamp(&ts))),
            None => parts.push(heading.to_string()),
        }
    }
    parts.extend(body);

    Some(format!("{}\n", parts.join("\n\n")))
}

fn render_block(block: &ContentBlock) -> Option<String> {
    match block {
        ContentBlock::Text(text) => {
            let text = text.trim();
            (!text.is_empty() && text != NO_CONTENT).then(|| text.to_string())
        }
        ContentBlock::Thinking(_) => None,
        ContentBlock::ToolUse { name, input, .. } => Some(render_tool_use(name, input)),
        ContentBlock::ToolResult { content, is_error, .. } => {
            Some(render_tool_result(content, *is_error))
        }
    }
}

fn render_tool_use(name: &str, input: &Value) -> String {
    let line = format!("**Tool: `{}`**", name);
    if input.is_null() {
        return line;
    }
    let params = serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string());
    format!("{}\n\n{}", line, fenced(&params, "json"))
}

fn render_tool_result(content: &str, is_error: bool) -> String {
    let label = if is_error { "**Result (error):**" } else { "**Result:**" };
    let (shown, truncated) = truncate_chars(content.trim_end(), MAX_TOOL_RESULT_CHARS);
    let body = if truncated {
        format!("{}\n{}", shown, TRUNCATION_MARKER)
    } else {
        shown.to_string()
    };
    format!("{}\n\n{}", label, fenced(&body, ""))
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    format!("*{}*", ts.format("%Y-%m-%d %H:%M:%S UTC"))
}

/// Wraps content in a code fence longer than any backtick run inside it
fn fenced(content: &str, lang: &str) -> String {
    let longest_run = content
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}{lang}\n{content}\n{fence}")
}

/// Cuts `text` to at most `max` characters, on a char boundary
fn truncate_chars(text: &str, max: usize) -> (&str, bool) {
    match text.char_indices().nth(max) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}
