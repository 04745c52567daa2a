//! Markdown rendering of assistant transcripts
//!
//! A rendered transcript is a `# Chat History` title followed by one section per
//! conversational record, in input order:
//!
//! - user turns under `### User`
//! - assistant turns under `### Assistant`, with each tool invocation as a
//!   ``**Tool: `name`**`` line and a fenced block of its input
//! - tool results as fenced blocks, truncated past [`MAX_TOOL_RESULT_CHARS`]

pub mod markdown;

pub use markdown::{MAX_TOOL_RESULT_CHARS, TRUNCATION_MARKER, render, render_reader, render_records};
