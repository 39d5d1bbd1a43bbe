//! HealthRepository - database reachability probe

use super::RepositoryResult;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{instrument, warn};

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Round-trips a trivial statement through the pool
    async fn ping(&self) -> RepositoryResult<()>;
}

pub struct HealthRepository {
    connection_pool: PgPool,
}

impl HealthRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl HealthCheck for HealthRepository {
    #[instrument(skip(self))]
    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.connection_pool)
            .await
            .map_err(|e| {
                warn!("Database ping failed: {}", e);
                e
            })?;
        Ok(())
    }
}
