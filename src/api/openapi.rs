//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{equipment, health, products};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inspecta API",
        version = "2.0.0",
        description = "Equipment inspection record store",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::save_equipment,
        equipment::delete_equipment,
        equipment::clear_equipment,
        equipment::equipment_stats,
        equipment::new_barcode,
        equipment::reload_equipment,
        // Products
        products::list_products,
        products::get_product,
        products::import_products,
        products::clear_products,
    ),
    components(
        schemas(
            // Equipment
            crate::models::EquipmentRecord,
            crate::models::ButtonStatus,
            crate::models::StorageCapacity,
            crate::models::Classification,
            crate::models::AudioCondition,
            crate::models::PinCondition,
            crate::models::FaceIdStatus,
            crate::models::CameraCondition,
            crate::store::StoreStats,
            crate::store::SearchField,
            equipment::SaveResponse,
            equipment::DeleteResponse,
            equipment::ClearResponse,
            equipment::BarcodeResponse,
            equipment::ReloadResponse,
            // Products
            crate::models::ProductSku,
            crate::models::CsvImport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "equipment", description = "Inspection records"),
        (name = "products", description = "Product SKU catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
