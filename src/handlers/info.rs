//! Internal endpoints, reachable without a token

use crate::core::AppState;
use crate::dtos::InfoResponse;
use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;
use tracing::{debug, error};

pub async fn get_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: state.app_name.clone(),
        version: state.app_version.clone(),
    })
}

pub async fn get_health(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.health.ping().await {
        Ok(()) => {
            debug!("Health check passed");
            (StatusCode::OK, "OK")
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Error pinging database")
        }
    }
}
