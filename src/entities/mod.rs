//! Entities module - domain records persisted in the database
//!
//! Each entity maps one-to-one onto a table created by the files in `migrations/`.

pub mod employee;
pub mod role;

pub use employee::Employee;
pub use role::Role;
