//! Employee handlers - `/api/v1/employees`

use crate::core::{AppError, AppState, Claims, IdmRole, require_role};
use crate::dtos::{ApiResponse, CreateEmployeeRequest, EmployeeDTO, PageRequest, PageResponse};
use crate::entities::Employee;
use axum::{
    Extension,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<i64>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Json(request) = body?;

    let id = state.employees.create_employee(request).await?;

    info!("Employee {} created", id);
    Ok(Json(ApiResponse::ok(id)))
}

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn add_employee(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Employee>, JsonRejection>,
) -> Result<Json<ApiResponse<EmployeeDTO>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Json(employee) = body?;

    let created = state.employees.add(employee).await?;
    Ok(Json(ApiResponse::ok(created)))
}

#[instrument(skip(state, claims), fields(sub = %claims.sub))]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<EmployeeDTO>>>, AppError> {
    require_role(&claims, IdmRole::User)?;

    let employees = state.employees.find_all().await?;

    debug!("Returning {} employees", employees.len());
    Ok(Json(ApiResponse::ok(employees)))
}

#[instrument(skip(state, claims, query), fields(sub = %claims.sub))]
pub async fn employees_page(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<ApiResponse<PageResponse>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    let Query(request) = query?;

    let page = state.employees.find_page(request).await?;

    debug!("Returning {} of {} employees", page.result.len(), page.total);
    Ok(Json(ApiResponse::ok(page)))
}

#[instrument(skip(state, claims, path), fields(sub = %claims.sub))]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<EmployeeDTO>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    let Path(id) = path?;

    let employee = state.employees.find_by_id(id).await?;
    Ok(Json(ApiResponse::ok(employee)))
}

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn get_employees_by_ids(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Vec<i64>>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<EmployeeDTO>>>, AppError> {
    require_role(&claims, IdmRole::User)?;
    let Json(ids) = body?;

    let employees = state.employees.find_by_ids(&ids).await?;
    Ok(Json(ApiResponse::ok(employees)))
}

#[instrument(skip(state, claims, path), fields(sub = %claims.sub))]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<EmployeeDTO>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Path(id) = path?;

    let deleted = state.employees.delete_by_id(id).await?;
    Ok(Json(ApiResponse::ok(deleted)))
}

#[instrument(skip(state, claims, body), fields(sub = %claims.sub))]
pub async fn delete_employees_by_ids(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Vec<i64>>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<EmployeeDTO>>>, AppError> {
    require_role(&claims, IdmRole::Admin)?;
    let Json(ids) = body?;

    let deleted = state.employees.delete_by_ids(&ids).await?;

    info!("Deleted {} employees", deleted.len());
    Ok(Json(ApiResponse::ok(deleted)))
}
