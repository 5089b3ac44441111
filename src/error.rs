use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain raw output from a child process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Failed to run {command}: {detail}")]
    SpawnFailed { command: String, detail: String },

    #[error("Git command failed: {command}\n{detail}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("Output of {command} exceeded the buffer limit of {limit} bytes")]
    BufferExceeded { command: String, limit: usize },

    #[error("{command} timed out after {}ms and was killed", timeout.as_millis())]
    TimedOut { command: String, timeout: Duration },
}

impl ExtractionError {
    /// Human readable detail: stderr text, OS error, or the limit that was hit.
    pub fn detail(&self) -> String {
        match self {
            ExtractionError::SpawnFailed { detail, .. } => detail.clone(),
            ExtractionError::CommandFailed { detail, code, .. } => {
                let detail = detail.trim();
                if detail.is_empty() {
                    match code {
                        Some(code) => format!("exited with status {}", code),
                        None => "terminated by signal".to_string(),
                    }
                } else {
                    detail.to_string()
                }
            }
            ExtractionError::BufferExceeded { limit, .. } => {
                format!("maxBuffer exceeded: output larger than {} bytes", limit)
            }
            ExtractionError::TimedOut { timeout, .. } => {
                format!("timed out after {}ms", timeout.as_millis())
            }
        }
    }

    pub fn command(&self) -> &str {
        match self {
            ExtractionError::SpawnFailed { command, .. }
            | ExtractionError::CommandFailed { command, .. }
            | ExtractionError::BufferExceeded { command, .. }
            | ExtractionError::TimedOut { command, .. } => command,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse git output: {reason}")]
pub struct ParseError {
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum DevdashError {
    #[error("Not a git repository: {path}")]
    NotGitRepository { path: PathBuf },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    RequestError(String),
}

pub type Result<T> = std::result::Result<T, DevdashError>;
