//! Health check endpoints

use axum::{extract::State, Json};

use super::blocking;
use crate::error::AppResult;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Whether the storage medium accepts writes
    pub storage_available: bool,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<crate::AppState>) -> AppResult<Json<HealthResponse>> {
    let service = state.services.equipment.clone();
    let storage_available = blocking(move || service.is_available()).await?;
    Ok(Json(HealthResponse {
        status: if storage_available { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_available,
    }))
}
