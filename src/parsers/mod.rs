//! JSONL parser for assistant session transcripts
//!
//! # Error Handling Strategy
//!
//! Transcripts are read with **graceful degradation**:
//!
//! - **Individual line failures**: Malformed lines are logged with `tracing` and skipped,
//!   so a single bad line never breaks the rendering of a session.
//!
//! - **Non-conversation lines**: Summaries, file-history snapshots and system lines are
//!   well-formed but carry no conversation; they are skipped silently.
//!
//! - **No failure threshold**: Unlike an index, a rendered transcript is still useful when
//!   most of it is damaged, so reading never gives up on a file it could open.

pub mod deserializers;
pub mod transcript;

pub use transcript::{TranscriptReader, open_transcript};
