//! Repository error type
//!
//! Repositories return raw infrastructure errors; adding operation context and
//! classifying failures is the service layer's job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Any failure reported by the driver (connection, constraint, decoding ...)
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A bulk operation received an empty id set; the database was not queried
    #[error("{0} must not be empty")]
    EmptyArgument(&'static str),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
