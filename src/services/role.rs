//! Role service - CRUD over roles, no transaction involved

use super::error::repository_error;
use super::{ServiceError, ServiceResult};
use crate::dtos::{CreateRoleDTO, CreateRoleRequest, RoleDTO};
use crate::repositories::{Create, Delete, DeleteMany, Read, ReadAll, ReadMany, RoleRepo};
use async_trait::async_trait;
use tracing::{info, instrument};
use validator::Validate;

#[async_trait]
pub trait RoleOps: Send + Sync {
    async fn add(&self, request: CreateRoleRequest) -> ServiceResult<RoleDTO>;
    async fn find_by_id(&self, id: i64) -> ServiceResult<RoleDTO>;
    async fn find_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<RoleDTO>>;
    async fn find_all(&self) -> ServiceResult<Vec<RoleDTO>>;
    async fn delete_by_id(&self, id: i64) -> ServiceResult<RoleDTO>;
    async fn delete_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<RoleDTO>>;
}

pub struct RoleService<R> {
    repo: R,
}

impl<R: RoleRepo> RoleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

fn validate_id(id: i64) -> ServiceResult<()> {
    if id <= 0 {
        return Err(ServiceError::Validation(format!("wrong role id: {id}")));
    }
    Ok(())
}

#[async_trait]
impl<R: RoleRepo> RoleOps for RoleService<R> {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn add(&self, request: CreateRoleRequest) -> ServiceResult<RoleDTO> {
        request.validate()?;
        let data = CreateRoleDTO::from(request);
        let role = self
            .repo
            .create(&data)
            .await
            .map_err(repository_error(format!("creating role '{}'", data.name)))?;
        info!("Role created with id {}", role.id);
        Ok(RoleDTO::from(role))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> ServiceResult<RoleDTO> {
        validate_id(id)?;
        self.repo
            .read(&id)
            .await
            .map_err(repository_error(format!("finding role with id {id}")))?
            .map(RoleDTO::from)
            .ok_or_else(|| ServiceError::NotFound(format!("role with id {id}")))
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<RoleDTO>> {
        if ids.is_empty() {
            return Err(ServiceError::EmptyArgument("role ids"));
        }
        let roles = self
            .repo
            .read_many(ids)
            .await
            .map_err(repository_error(format!("finding roles with ids {ids:?}")))?;
        Ok(roles.into_iter().map(RoleDTO::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ServiceResult<Vec<RoleDTO>> {
        let roles = self
            .repo
            .read_all()
            .await
            .map_err(repository_error("finding all roles"))?;
        Ok(roles.into_iter().map(RoleDTO::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> ServiceResult<RoleDTO> {
        validate_id(id)?;
        let deleted = self
            .repo
            .delete(&id)
            .await
            .map_err(repository_error(format!("deleting role with id {id}")))?;
        if !deleted {
            return Err(ServiceError::NotFound(format!("role with id {id}")));
        }
        info!("Role {} deleted", id);
        Ok(RoleDTO::with_id(id))
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<RoleDTO>> {
        if ids.is_empty() {
            return Err(ServiceError::EmptyArgument("role ids"));
        }
        let deleted = self
            .repo
            .delete_many(ids)
            .await
            .map_err(repository_error(format!("deleting roles with ids {ids:?}")))?;
        info!("Deleted {} of {} requested roles", deleted.len(), ids.len());
        Ok(deleted.into_iter().map(RoleDTO::with_id).collect())
    }
}
