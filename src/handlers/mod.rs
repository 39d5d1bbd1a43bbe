//! HTTP handlers - extract, authorize, delegate to the services, wrap the
//! result in [`crate::dtos::ApiResponse`]

pub mod employee;
pub mod info;
pub mod role;

pub use employee::*;
pub use info::*;
pub use role::*;
