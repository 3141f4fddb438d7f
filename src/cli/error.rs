//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApiError, ApplicationError};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("cancelled")]
    Cancelled,
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Cancelled => crate::exitcode::FAILURE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Http { .. } => crate::exitcode::SOFTWARE,
                InfraError::Prompt { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(_) | ApplicationError::InvalidInput(_) => {
                        crate::exitcode::USAGE
                    }
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                    ApplicationError::Api(api) => match api {
                        ApiError::Transport { .. } => crate::exitcode::UNAVAILABLE,
                        ApiError::Decode { .. } => crate::exitcode::DATAERR,
                        ApiError::InvalidUrl { .. } => crate::exitcode::CONFIG,
                        ApiError::Rejected { .. }
                        | ApiError::Validation { .. }
                        | ApiError::Status { .. } => crate::exitcode::FAILURE,
                    },
                },
            },
        }
    }

    /// Field-level messages for validation failures, one per line.
    pub fn details(&self) -> &[String] {
        match self {
            CliError::Infra(InfraError::Application(ApplicationError::Api(
                ApiError::Validation { errors, .. },
            ))) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_transport_error_when_mapping_then_unavailable() {
        let err: CliError = ApplicationError::from(ApiError::Transport {
            url: "http://x".into(),
            message: "refused".into(),
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::UNAVAILABLE);
    }

    #[test]
    fn given_rejected_error_when_mapping_then_failure() {
        let err: CliError = ApplicationError::from(ApiError::Rejected {
            status: 404,
            detail: "not found".into(),
        })
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::FAILURE);
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn given_missing_remote_when_mapping_then_usage() {
        let err: CliError = ApplicationError::from(DomainError::MissingRemote).into();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_validation_error_when_asking_details_then_lists_fields() {
        let err: CliError = ApplicationError::from(ApiError::Validation {
            status: 422,
            errors: vec!["name: field required".into()],
        })
        .into();
        assert_eq!(err.details().to_vec(), vec!["name: field required".to_string()]);
        // printed once, as a detail line
        assert_eq!(err.to_string(), "validation failed (422)");
    }
}
