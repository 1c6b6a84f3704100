//! API handlers for Inspecta REST endpoints

pub mod equipment;
pub mod health;
pub mod openapi;
pub mod products;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    catalog::MAX_CSV_BYTES,
    error::{AppError, AppResult},
    AppState,
};

/// Run store or catalog work off the async workers.
///
/// Both touch the storage medium synchronously, and the file medium does
/// plain `std::fs` I/O.
pub(crate) async fn blocking<F, T>(work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Storage task failed: {e}")))
}

/// Create the application router with all routes
///
/// The literal segments `stats`, `barcode` and `reload` take precedence over
/// `/equipment/{barcode}`, so a record stored under one of those barcodes is
/// only reachable through the listing. Generated barcodes always start with
/// `EQ` and never collide.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Equipment records
        .route(
            "/equipment",
            get(equipment::list_equipment)
                .post(equipment::save_equipment)
                .delete(equipment::clear_equipment),
        )
        .route("/equipment/stats", get(equipment::equipment_stats))
        .route("/equipment/barcode", post(equipment::new_barcode))
        .route("/equipment/reload", post(equipment::reload_equipment))
        .route(
            "/equipment/:barcode",
            get(equipment::get_equipment).delete(equipment::delete_equipment),
        )
        // Product catalog
        .route(
            "/products",
            get(products::list_products).delete(products::clear_products),
        )
        .route(
            "/products/import",
            post(products::import_products).layer(DefaultBodyLimit::max(MAX_CSV_BYTES * 2)),
        )
        .route("/products/:sku", get(products::get_product))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
