//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent invalid user input or malformed local data.
/// These are independent of the service and of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("no remote found")]
    MissingRemote,

    #[error("no remote \"origin\" configured in {0}")]
    NoOriginRemote(PathBuf),

    #[error("invalid assignment '{0}': expected KEY=VALUE")]
    InvalidAssignment(String),

    #[error("invalid env file {path}: line {line}: {message}")]
    InvalidEnvFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
