//! IDM server library - exposes the main modules for the binary and the tests

pub mod core;
pub mod dtos;
pub mod entities;
pub mod handlers;
pub mod repositories;
pub mod services;

pub use crate::core::{AppError, AppState, auth, config};

use axum::{
    Router,
    http::HeaderName,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api/v1", configure_api_routes(state.clone()))
        .nest("/internal", configure_internal_routes())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

/// Renders a handler panic as the standard error envelope
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!("Handler panicked: {}", detail);
    AppError::internal_server_error("internal server error").into_response()
}

/// Routes under `/api/v1`, all behind bearer authentication
fn configure_api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use handlers::*;

    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/add", post(add_employee))
        .route("/employees/page", get(employees_page))
        .route(
            "/employees/ids",
            post(get_employees_by_ids).delete(delete_employees_by_ids),
        )
        .route("/employees/{id}", get(get_employee).delete(delete_employee))
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/ids", post(get_roles_by_ids).delete(delete_roles_by_ids))
        .route("/roles/{id}", get(get_role).delete(delete_role))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Unauthenticated operational endpoints
fn configure_internal_routes() -> Router<Arc<AppState>> {
    use handlers::{get_health, get_info};

    Router::new()
        .route("/info", get(get_info))
        .route("/health", get(get_health))
}
