//! Application-level errors (wraps domain and API errors)

use thiserror::Error;

use crate::application::api::ApiError;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
