//! Repositories module - database access for every resource
//!
//! Each repository owns a clone of the PostgreSQL pool and implements the
//! generic CRUD traits declared in [`traits`], plus whatever resource-specific
//! queries the services need. Services only ever see the traits, so tests can
//! swap in doubles.
//!
//! Queries use the runtime-checked `sqlx::query_as::<_, T>()` /
//! `sqlx::query_scalar()` builders, so no database is needed at compile time.

pub mod employee;
pub mod error;
pub mod health;
pub mod role;
pub mod traits;

pub use error::{RepositoryError, RepositoryResult};
pub use health::{HealthCheck, HealthRepository};
pub use traits::{
    Create, Delete, DeleteMany, EmployeeRepo, Read, ReadAll, ReadMany, RoleRepo, Transactional,
};

pub use employee::EmployeeRepository;
pub use role::RoleRepository;
