//! Data models for prompt directories and assistant transcripts.
//!
//! - [`PromptDirName`] - The `{month}-{day}-{year2}-{seq}-{slug}` directory name
//! - [`PromptDirectory`] - A prompt directory on disk and the files it holds
//! - [`TranscriptRecord`] - One conversational line of an assistant log
//!
//! The raw wire shapes of log lines live next to their parser in
//! `parsers::transcript`; these are the types the rest of the crate works with.

pub mod prompt_dir;
pub mod transcript;

pub use prompt_dir::{
    CHAT_HISTORY_JSONL, CHAT_HISTORY_MD, PLAN_FILE, PROMPT_FILE, PromptDirName, PromptDirectory,
    SESSION_ID_FILE, read_session_id,
};
pub use transcript::{ContentBlock, RecordKind, TranscriptRecord};
