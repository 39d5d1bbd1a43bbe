//! Application State - shared by every route and middleware

use crate::core::Config;
use crate::repositories::{EmployeeRepository, HealthCheck, HealthRepository, RoleRepository};
use crate::services::{EmployeeOps, EmployeeService, RoleOps, RoleService};
use sqlx::PgPool;
use std::sync::Arc;

pub struct AppState {
    pub employees: Arc<dyn EmployeeOps>,

    pub roles: Arc<dyn RoleOps>,

    /// Backs `GET /internal/health`
    pub health: Arc<dyn HealthCheck>,

    /// Reported by `GET /internal/info`
    pub app_name: String,
    pub app_version: String,

    /// HS256 key used to verify bearer tokens
    pub jwt_secret: String,
}

impl AppState {
    /// Wires the PostgreSQL repositories into the services
    ///
    /// # Arguments
    /// * `pool` - Shared PostgreSQL connection pool
    /// * `config` - Supplies the JWT secret, the query deadlines and the
    ///   name/version reported by the info endpoint
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            employees: Arc::new(EmployeeService::new(
                EmployeeRepository::new(pool.clone()),
                config.deadlines(),
            )),
            roles: Arc::new(RoleService::new(RoleRepository::new(pool.clone()))),
            health: Arc::new(HealthRepository::new(pool)),
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
            jwt_secret: config.jwt_secret.clone(),
        }
    }
}
