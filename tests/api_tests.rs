//! API integration tests, driving the router in-process

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use inspecta_server::{
    api,
    catalog::ProductCatalog,
    events::StoreEvents,
    services::Services,
    storage::{MemoryStorage, StorageBackend},
    store::{RecordStore, StoreSettings},
    AppConfig, AppState,
};

fn build_app() -> (Router, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let backend: Arc<dyn StorageBackend> = storage.clone();
    let store = Arc::new(RecordStore::open(
        backend.clone(),
        StoreSettings::default(),
        StoreEvents::default(),
    ));
    let catalog = Arc::new(ProductCatalog::new(backend, "equipment-products-sku"));
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(store, catalog)),
    };
    (api::create_router(state), storage)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    // Extractor rejections come back as plain text.
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage_available"], true);
}

#[tokio::test]
async fn test_health_reports_degraded_storage() {
    let (app, storage) = build_app();
    storage.set_available(false);
    let (_, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_save_search_delete_scenario() {
    let (app, _) = build_app();

    for (barcode, model) in [("EQ001", "iPhone 14"), ("EQ002", "Galaxy S23")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/equipment",
            Some(json!({ "barcode": barcode, "model": model, "classification": "OB" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], true);
        assert!(body["record"]["generatedAt"].is_string());
    }

    let (_, hits) = send(&app, Method::GET, "/api/v1/equipment?q=iphone&field=model", None).await;
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["barcode"], "EQ001");

    let (_, body) = send(&app, Method::DELETE, "/api/v1/equipment/EQ001", None).await;
    assert_eq!(body["deleted"], true);
    let (_, body) = send(&app, Method::DELETE, "/api/v1/equipment/EQ001", None).await;
    assert_eq!(body["deleted"], false);

    let (_, all) = send(&app, Method::GET, "/api/v1/equipment", None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["barcode"], "EQ002");
}

#[tokio::test]
async fn test_save_replaces_existing_barcode() {
    let (app, _) = build_app();
    let url = "/api/v1/equipment";
    send(&app, Method::POST, url, Some(json!({ "barcode": "EQ1", "model": "old" }))).await;
    let (_, body) = send(&app, Method::POST, url, Some(json!({ "barcode": "EQ1", "model": "new" }))).await;
    assert_eq!(body["total"], 1);

    let (status, record) = send(&app, Method::GET, "/api/v1/equipment/EQ1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["model"], "new");
}

#[tokio::test]
async fn test_invalid_records_are_rejected() {
    let (app, _) = build_app();
    let url = "/api/v1/equipment";

    let (status, body) = send(&app, Method::POST, url, Some(json!({ "barcode": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (status, _) = send(&app, Method::POST, url, Some(json!({ "barcode": "EQ1", "battery": 140 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, url, Some(json!({ "barcode": "EQ1", "classification": "ZZ" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.as_str().is_some_and(|text| text.contains("classification")));

    let (_, body) = send(&app, Method::GET, "/api/v1/equipment/stats", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_save_on_unavailable_storage_reports_failure() {
    let (app, storage) = build_app();
    storage.set_available(false);
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/equipment",
        Some(json!({ "barcode": "EQ1" })),
    )
    .await;
    assert_eq!(status, StatusCode::INSUFFICIENT_STORAGE);
    assert_eq!(body["saved"], false);
    assert_eq!(body["total"], 0);

    let (status, _) = send(&app, Method::GET, "/api/v1/equipment/EQ1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_barcode_is_404() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::GET, "/api/v1/equipment/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_clear_and_stats() {
    let (app, _) = build_app();
    send(&app, Method::POST, "/api/v1/equipment", Some(json!({ "barcode": "EQ1" }))).await;

    let (_, stats) = send(&app, Method::GET, "/api/v1/equipment/stats", None).await;
    assert_eq!(stats["count"], 1);
    assert_eq!(stats["version"], "2.0.0");

    let (_, body) = send(&app, Method::DELETE, "/api/v1/equipment", None).await;
    assert_eq!(body["cleared"], true);
    let (_, stats) = send(&app, Method::GET, "/api/v1/equipment/stats", None).await;
    assert_eq!(stats["count"], 0);
}

#[tokio::test]
async fn test_new_barcode() {
    let (app, _) = build_app();
    let (status, body) = send(&app, Method::POST, "/api/v1/equipment/barcode", None).await;
    assert_eq!(status, StatusCode::OK);
    let code = body["barcode"].as_str().unwrap();
    assert!(code.starts_with("EQ"));
    assert_eq!(code.len(), 14);
}

#[tokio::test]
async fn test_product_import() {
    let (app, _) = build_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products/import")
        .header("content-type", "text/csv")
        .body(Body::from("SKU,Nombre\nA1,iPhone 15\nA1,Duplicate\nB2,iPad mini 7"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let report: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["duplicates"], 1);
    assert_eq!(report["products"].as_array().unwrap().len(), 2);

    let (_, products) = send(&app, Method::GET, "/api/v1/products", None).await;
    assert_eq!(products.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::DELETE, "/api/v1/products", None).await;
    assert_eq!(body["cleared"], true);
    let (_, products) = send(&app, Method::GET, "/api/v1/products", None).await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_product_lookup_by_sku() {
    let (app, storage) = build_app();
    storage
        .set_item("equipment-products-sku", r#"[{"sku":"IPH12-128","nombre":"iPhone 12 128GB"}]"#)
        .unwrap();

    let (status, body) = send(&app, Method::GET, "/api/v1/products/IPH12-128", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "iPhone 12 128GB");

    let (status, body) = send(&app, Method::GET, "/api/v1/products/NOPE", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRecord");
}

#[tokio::test]
async fn test_reload_reads_the_medium_again() {
    let (app, storage) = build_app();
    send(&app, Method::POST, "/api/v1/equipment", Some(json!({ "barcode": "EQ1" }))).await;

    // Another process rewrote the envelope.
    storage
        .set_item(
            "gray_think_equipments_v2",
            r#"{"equipments":[{"barcode":"EXT1"},{"barcode":"EXT2"}],"lastUpdated":"2024-05-01T10:00:00Z","version":"2.0.0"}"#,
        )
        .unwrap();

    let (status, body) = send(&app, Method::POST, "/api/v1/equipment/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (status, _) = send(&app, Method::GET, "/api/v1/equipment/EQ1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/v1/equipment/EXT2", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_import_rejects_bad_header() {
    let (app, _) = build_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products/import")
        .body(Body::from("Code,Label\nA1,x"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_literal_routes_take_precedence_over_barcodes() {
    let (app, _) = build_app();
    send(&app, Method::POST, "/api/v1/equipment", Some(json!({ "barcode": "stats" }))).await;

    let (status, body) = send(&app, Method::GET, "/api/v1/equipment/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert!(body.get("barcode").is_none());

    // Still reachable through the listing.
    let (_, hits) = send(&app, Method::GET, "/api/v1/equipment?q=stats&field=barcode", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
}
