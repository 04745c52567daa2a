//! Error types for prompt directory operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the allocator and session operations.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The target prompt directory is already on disk
    #[error("Directory already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// The assistant's log for a session could not be found
    #[error("Chat history not found at {}", path.display())]
    HistoryNotFound { path: PathBuf },

    /// A session id that cannot name a log file
    #[error("Invalid session id: {id:?}")]
    InvalidSessionId { id: String },

    /// Keywords reduced to an empty slug
    #[error("At least one alphanumeric keyword is required")]
    EmptyKeywords,

    /// Every sequence number for the date is taken
    #[error("No sequence number left for {date}")]
    SequenceExhausted { date: String },

    /// A session directory given explicitly does not exist
    #[error("Session directory not found: {}", path.display())]
    SessionDirNotFound { path: PathBuf },

    /// Filesystem failure, with what was being attempted
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }
}

/// Result type for prompt directory operations.
pub type PromptResult<T> = Result<T, PromptError>;
