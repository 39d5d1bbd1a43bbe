//! Service error type - the taxonomy handlers map onto status codes

use crate::repositories::RepositoryError;
use std::time::Duration;
use thiserror::Error;
use validator::ValidationErrors;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-bounds input, fixable by the caller
    #[error("request validation failed: {0}")]
    Validation(String),

    #[error("employee with name '{name}' and surname '{surname}' already exists")]
    AlreadyExists { name: String, surname: String },

    #[error("{0} not found")]
    NotFound(String),

    /// A bulk operation got an empty id set
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),

    #[error("failed to begin transaction: {0}")]
    TransactionBegin(#[source] RepositoryError),

    #[error("failed to insert employee '{name} {surname}': {source}")]
    Insert {
        name: String,
        surname: String,
        #[source]
        source: RepositoryError,
    },

    /// The row may or may not have been persisted
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] RepositoryError),

    #[error("{cause}; rolling back the transaction also failed: {source}")]
    Rollback {
        cause: Box<ServiceError>,
        #[source]
        source: RepositoryError,
    },

    #[error("employee creation panicked: {0}")]
    Panicked(String),

    #[error("{operation} exceeded its deadline of {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },

    /// Any other storage failure, with what was being attempted
    #[error("{context}: {source}")]
    Repository {
        context: String,
        #[source]
        source: RepositoryError,
    },
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Wraps a repository failure with operation context.
///
/// `EmptyArgument` keeps its own kind so the boundary still reports it as a
/// caller error.
pub(crate) fn repository_error(
    context: impl Into<String>,
) -> impl FnOnce(RepositoryError) -> ServiceError {
    let context = context.into();
    move |source| match source {
        RepositoryError::EmptyArgument(what) => ServiceError::EmptyArgument(what),
        source => ServiceError::Repository { context, source },
    }
}
