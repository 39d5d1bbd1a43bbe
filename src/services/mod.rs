//! Services module - business rules between handlers and repositories
//!
//! Services validate input, orchestrate repository calls, translate entities
//! into DTOs and classify failures into [`ServiceError`]. They never issue SQL.
//! Handlers depend on the [`EmployeeOps`] / [`RoleOps`] traits rather than on
//! the concrete services.

pub mod employee;
pub mod error;
pub mod role;

pub use employee::{EmployeeOps, EmployeeService};
pub use error::{ServiceError, ServiceResult};
pub use role::{RoleOps, RoleService};

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Upper bounds for the long-running listing queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDeadlines {
    pub find_all: Duration,
    pub find_page: Duration,
}

impl Default for QueryDeadlines {
    fn default() -> Self {
        Self {
            find_all: Duration::from_secs(2),
            find_page: Duration::from_secs(4),
        }
    }
}

/// Runs `future` under `limit`; on expiry the future is dropped, which
/// cancels the in-flight query.
pub(crate) async fn with_deadline<T>(
    operation: &'static str,
    limit: Duration,
    future: impl Future<Output = T>,
) -> ServiceResult<T> {
    tokio::time::timeout(limit, future).await.map_err(|_| {
        warn!("{} exceeded its deadline of {:?}", operation, limit);
        ServiceError::Timeout { operation, limit }
    })
}
