//! Role handlers - `/api/v1/roles`

use crate::core::{AppError, AppState, Claims, IdmRole, require_role};
use crate::dtos::{ApiResponse, CreateRoleRequest, RoleDTO};
use axum::{
    Extension,
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RoleDTO>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Json(request) = body?;

    let role = state.roles.add(request).await?;
    Ok(Json(ApiResponse::ok(role)))
}

#[instrument(skip(state, claims), fields(sub = %claims.sub))]
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<RoleDTO>>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    Ok(Json(ApiResponse::ok(state.roles.find_all().await?)))
}

#[instrument(skip(state, claims, path), fields(sub = %claims.sub))]
pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<RoleDTO>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    let Path(id) = path?;
    Ok(Json(ApiResponse::ok(state.roles.find_by_id(id).await?)))
}

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn get_roles_by_ids(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Vec<i64>>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<RoleDTO>>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    let Json(ids) = body?;
    Ok(Json(ApiResponse::ok(state.roles.find_by_ids(&ids).await?)))
}

#[instrument(skip(state, claims, path), fields(sub = %claims.sub))]
pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<RoleDTO>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Path(id) = path?;
    Ok(Json(ApiResponse::ok(state.roles.delete_by_id(id).await?)))
}

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn delete_roles_by_ids(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Vec<i64>>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<RoleDTO>>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Json(ids) = body?;
    Ok(Json(ApiResponse::ok(state.roles.delete_by_ids(&ids).await?)))
}
