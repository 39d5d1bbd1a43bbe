//! RoleRepository - PostgreSQL storage for roles

use super::{Create, Delete, DeleteMany, Read, ReadAll, ReadMany, RepositoryError, RepositoryResult};
use crate::dtos::CreateRoleDTO;
use crate::entities::Role;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

const SELECT_ROLE: &str = "SELECT id, name, created_at, updated_at FROM role";

// ROLE REPOSITORY
pub struct RoleRepository {
    connection_pool: PgPool,
}

impl RoleRepository {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl Create<Role, CreateRoleDTO> for RoleRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateRoleDTO) -> RepositoryResult<Role> {
        let new_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO role (name, created_at, updated_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&data.name)
        .bind(data.created_at)
        .bind(data.updated_at)
        .fetch_one(&self.connection_pool)
        .await?;

        info!("Role created with id {}", new_id);
        Ok(data.clone().into_entity(new_id))
    }
}

#[async_trait]
impl Read<Role, i64> for RoleRepository {
    #[instrument(skip(self), fields(role_id = %id))]
    async fn read(&self, id: &i64) -> RepositoryResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await?;

        if role.is_none() {
            debug!("Role not found");
        }
        Ok(role)
    }
}

#[async_trait]
impl ReadMany<Role, i64> for RoleRepository {
    #[instrument(skip(self), fields(count = ids.len()))]
    async fn read_many(&self, ids: &[i64]) -> RepositoryResult<Vec<Role>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("role ids"));
        }
        let roles = sqlx::query_as::<_, Role>(&format!(
            "{SELECT_ROLE} WHERE id = ANY($1) ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await?;
        Ok(roles)
    }
}

#[async_trait]
impl ReadAll<Role> for RoleRepository {
    #[instrument(skip(self))]
    async fn read_all(&self) -> RepositoryResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} ORDER BY id ASC"))
            .fetch_all(&self.connection_pool)
            .await?;
        Ok(roles)
    }
}

#[async_trait]
impl Delete<i64> for RoleRepository {
    #[instrument(skip(self), fields(role_id = %id))]
    async fn delete(&self, id: &i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM role WHERE id = $1")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DeleteMany<i64> for RoleRepository {
    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_many(&self, ids: &[i64]) -> RepositoryResult<Vec<i64>> {
        if ids.is_empty() {
            return Err(RepositoryError::EmptyArgument("role ids"));
        }
        let deleted =
            sqlx::query_scalar::<_, i64>("DELETE FROM role WHERE id = ANY($1) RETURNING id")
                .bind(ids)
                .fetch_all(&self.connection_pool)
                .await?;

        info!("Deleted {} of {} requested roles", deleted.len(), ids.len());
        Ok(deleted)
    }
}
