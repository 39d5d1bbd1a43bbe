//! Core Module - application infrastructure
//!
//! - JWT authentication and role checks
//! - Configuration
//! - Error to response mapping
//! - Shared application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use auth::{Claims, IdmRole, authentication_middleware, decode_jwt, encode_jwt, require_role};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
