//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the external (API) representation from the internal one (entities).

pub mod employee;
pub mod info;
pub mod page;
pub mod response;
pub mod role;

pub use employee::{CreateEmployeeDTO, CreateEmployeeRequest, EmployeeDTO};
pub use info::InfoResponse;
pub use page::{PageRequest, PageResponse};
pub use response::ApiResponse;
pub use role::{CreateRoleDTO, CreateRoleRequest, RoleDTO};
