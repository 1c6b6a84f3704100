//! Product catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use super::blocking;
use crate::{
    api::equipment::ClearResponse,
    error::{AppError, AppResult},
    models::{CsvImport, ProductSku},
};

/// List imported products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "Product list", body = Vec<ProductSku>)
    )
)]
pub async fn list_products(State(state): State<crate::AppState>) -> AppResult<Json<Vec<ProductSku>>> {
    let service = state.services.products.clone();
    Ok(Json(blocking(move || service.list()).await?))
}

/// Look up one product by SKU
#[utoipa::path(
    get,
    path = "/products/{sku}",
    tag = "products",
    params(("sku" = String, Path, description = "Product SKU")),
    responses(
        (status = 200, description = "Product", body = ProductSku),
        (status = 404, description = "Unknown SKU", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<crate::AppState>,
    Path(sku): Path<String>,
) -> AppResult<Json<ProductSku>> {
    let service = state.services.products.clone();
    let key = sku.clone();
    blocking(move || service.find(&key))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", sku)))
}

/// Import a `SKU,Nombre` CSV, replacing the product list
#[utoipa::path(
    post,
    path = "/products/import",
    tag = "products",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import report", body = CsvImport),
        (status = 400, description = "Invalid CSV", body = crate::error::ErrorResponse)
    )
)]
pub async fn import_products(
    State(state): State<crate::AppState>,
    body: String,
) -> AppResult<Json<CsvImport>> {
    let service = state.services.products.clone();
    let report = blocking(move || service.import(&body)).await??;
    Ok(Json(report))
}

/// Remove the product list
#[utoipa::path(
    delete,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "Clear outcome", body = ClearResponse)
    )
)]
pub async fn clear_products(State(state): State<crate::AppState>) -> AppResult<Json<ClearResponse>> {
    let service = state.services.products.clone();
    let cleared = blocking(move || service.clear()).await?;
    Ok(Json(ClearResponse { cleared }))
}
