//! Equipment record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::blocking;
use crate::{
    error::{AppError, AppResult},
    models::EquipmentRecord,
    store::{SearchField, StoreStats},
};

/// Listing filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring; empty returns every record
    pub q: Option<String>,
    /// Field to match, defaults to `all`
    #[param(inline)]
    pub field: Option<SearchField>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveResponse {
    /// Whether the record reached the storage medium
    pub saved: bool,
    /// Records in the store after the save
    pub total: usize,
    pub record: EquipmentRecord,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ClearResponse {
    pub cleared: bool,
}

#[derive(Serialize, ToSchema)]
pub struct BarcodeResponse {
    pub barcode: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReloadResponse {
    /// Records read back from the medium
    pub total: usize,
}

/// List or search equipment records
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching records", body = Vec<EquipmentRecord>)
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<EquipmentRecord>>> {
    let service = state.services.equipment.clone();
    let records = blocking(move || match query.q.as_deref() {
        Some(q) => service.search(q, query.field.unwrap_or_default()),
        None => service.list(),
    })
    .await?;
    Ok(Json(records))
}

/// Get a record by barcode
#[utoipa::path(
    get,
    path = "/equipment/{barcode}",
    tag = "equipment",
    params(("barcode" = String, Path, description = "Record barcode")),
    responses(
        (status = 200, description = "Record", body = EquipmentRecord),
        (status = 404, description = "Unknown barcode", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    Path(barcode): Path<String>,
) -> AppResult<Json<EquipmentRecord>> {
    let service = state.services.equipment.clone();
    let key = barcode.clone();
    blocking(move || service.get(&key))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", barcode)))
}

/// Save (insert or replace) a record
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    request_body = EquipmentRecord,
    responses(
        (status = 200, description = "Record stored", body = SaveResponse),
        (status = 400, description = "Invalid record", body = crate::error::ErrorResponse),
        (status = 507, description = "Storage refused the write", body = SaveResponse)
    )
)]
pub async fn save_equipment(
    State(state): State<crate::AppState>,
    Json(record): Json<EquipmentRecord>,
) -> AppResult<(StatusCode, Json<SaveResponse>)> {
    if record.barcode.trim().is_empty() {
        return Err(AppError::Validation("barcode must not be empty".to_string()));
    }
    record
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = state.services.equipment.clone();
    let (saved, record, total) = blocking(move || {
        let (saved, record) = service.submit(record);
        (saved, record, service.stats().count)
    })
    .await?;
    let status = if saved {
        StatusCode::OK
    } else {
        StatusCode::INSUFFICIENT_STORAGE
    };

    Ok((status, Json(SaveResponse { saved, total, record })))
}

/// Delete a record by barcode
#[utoipa::path(
    delete,
    path = "/equipment/{barcode}",
    tag = "equipment",
    params(("barcode" = String, Path, description = "Record barcode")),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<crate::AppState>,
    Path(barcode): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let service = state.services.equipment.clone();
    let deleted = blocking(move || service.delete(&barcode)).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// Remove every record
#[utoipa::path(
    delete,
    path = "/equipment",
    tag = "equipment",
    responses(
        (status = 200, description = "Clear outcome", body = ClearResponse)
    )
)]
pub async fn clear_equipment(State(state): State<crate::AppState>) -> AppResult<Json<ClearResponse>> {
    let service = state.services.equipment.clone();
    let cleared = blocking(move || service.clear()).await?;
    Ok(Json(ClearResponse { cleared }))
}

/// Re-read the storage medium, dropping the in-process cache
#[utoipa::path(
    post,
    path = "/equipment/reload",
    tag = "equipment",
    responses(
        (status = 200, description = "Records now in the store", body = ReloadResponse)
    )
)]
pub async fn reload_equipment(State(state): State<crate::AppState>) -> AppResult<Json<ReloadResponse>> {
    let service = state.services.equipment.clone();
    let total = blocking(move || service.reload()).await?;
    Ok(Json(ReloadResponse { total }))
}

/// Store statistics
#[utoipa::path(
    get,
    path = "/equipment/stats",
    tag = "equipment",
    responses(
        (status = 200, description = "Counters", body = StoreStats)
    )
)]
pub async fn equipment_stats(State(state): State<crate::AppState>) -> Json<StoreStats> {
    // Answered from the cache, no I/O.
    Json(state.services.equipment.stats())
}

/// Generate a barcode for a new inspection form
#[utoipa::path(
    post,
    path = "/equipment/barcode",
    tag = "equipment",
    responses(
        (status = 200, description = "Unused barcode", body = BarcodeResponse)
    )
)]
pub async fn new_barcode(State(state): State<crate::AppState>) -> Json<BarcodeResponse> {
    Json(BarcodeResponse {
        barcode: state.services.equipment.new_barcode(),
    })
}
