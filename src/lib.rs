//! Inspecta equipment inspection store
//!
//! Persists used-equipment inspection reports as one JSON envelope in a
//! key-value storage medium, with search, stats, start-up recovery and a
//! small REST JSON API for form and listing front-ends.

use std::sync::Arc;

pub mod api;
pub mod barcode;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use store::RecordStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
