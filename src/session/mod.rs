//! Operations on prompt directories around an assistant session
//!
//! - [`save_chat`] copies a session log into a prompt directory and renders it
//! - [`launch`] runs the assistant for a session and saves the chat afterwards
//! - [`find_session`] resolves a resume query to a directory and session id
//! - [`continue_session`] / [`session_info`] manage follow-up prompts in one directory

pub mod continuation;
pub mod launch;
pub mod marker;
pub mod resume;
pub mod save;

pub use continuation::{
    ContinuedPrompt, SessionInfo, continue_session, find_latest_session, next_prompt_index,
    session_info, write_indexed_prompt,
};
pub use launch::{LaunchOptions, LaunchOutcome, SessionMode, build_command, launch};
pub use resume::{MatchKind, SessionMatch, find_session};
pub use save::{SavedChat, save_chat, source_log_path};
