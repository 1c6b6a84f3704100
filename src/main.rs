//! Inspecta Server - equipment inspection record store
//!
//! Serves the record store over a local REST JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspecta_server::{
    api,
    catalog::ProductCatalog,
    config::{AppConfig, LoggingConfig, StorageConfig, StorageKind},
    events::{StoreEvent, StoreEvents},
    services::Services,
    storage::{FileStorage, MemoryStorage, StorageBackend},
    store::{RecordStore, StoreSettings},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Inspecta Server v{}", env!("CARGO_PKG_VERSION"));

    let backend = open_backend(&config.storage)?;

    let store = Arc::new(RecordStore::open(
        backend.clone(),
        StoreSettings::from(&config.storage),
        StoreEvents::new(config.events.capacity),
    ));
    let catalog = Arc::new(ProductCatalog::new(backend, config.products.key.clone()));

    spawn_event_logger(&store);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(Services::new(store, catalog)),
    };
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("inspecta_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn open_backend(storage: &StorageConfig) -> anyhow::Result<Arc<dyn StorageBackend>> {
    let backend: Arc<dyn StorageBackend> = match storage.backend {
        StorageKind::File => {
            tracing::info!(dir = %storage.data_dir.display(), "Using file storage");
            Arc::new(FileStorage::open(&storage.data_dir, storage.quota_bytes)?)
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on exit");
            match storage.quota_bytes {
                Some(quota) => Arc::new(MemoryStorage::with_quota(quota)),
                None => Arc::new(MemoryStorage::new()),
            }
        }
    };
    Ok(backend)
}

/// Log every store mutation, the way a listing view would consume them
fn spawn_event_logger(store: &RecordStore) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(StoreEvent::RecordSaved { record, total, .. }) => {
                    tracing::info!(barcode = %record.barcode, model = %record.model, total, "equipment saved");
                }
                Ok(StoreEvent::RecordDeleted { barcode, total, .. }) => {
                    tracing::info!(%barcode, total, "equipment deleted");
                }
                Ok(StoreEvent::StoreCleared { .. }) => {
                    tracing::info!("equipment store cleared");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event logger lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
