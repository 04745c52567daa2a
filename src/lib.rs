//! newprompt - Prompt history directories for Claude Code sessions
//!
//! Each prompt lives in its own dated directory under a history root, named
//! `{month}-{day}-{yy}-{seq}-{slug}`. This library provides:
//!
//! - Allocation of uniquely named prompt directories with a prompt template
//! - Lazy parsing of assistant transcripts (JSONL) into typed records
//! - Markdown rendering of transcripts
//! - Saving a finished session's log next to its prompt, plus launch/resume helpers
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use newprompt::allocate;
//! use std::path::Path;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();
//! let dir = allocate(Path::new("/tmp/history"), date, None, &["fix", "auth"], None)?;
//! println!("Created {}", dir.path.display());
//! # Ok::<(), newprompt::PromptError>(())
//! ```

pub mod allocator;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use allocator::{allocate, slugify};
pub use error::{PromptError, PromptResult};
pub use models::{PromptDirName, PromptDirectory, TranscriptRecord};
pub use parsers::{TranscriptReader, open_transcript};
pub use render::render;
pub use session::save_chat;
pub use utils::paths::{format_path_with_tilde, project_slug};
