//! Business logic services

pub mod equipment;
pub mod products;

use std::sync::Arc;

use crate::{catalog::ProductCatalog, store::RecordStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub products: products::ProductService,
}

impl Services {
    /// Create all services over the given store and catalog
    pub fn new(store: Arc<RecordStore>, catalog: Arc<ProductCatalog>) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(store),
            products: products::ProductService::new(catalog),
        }
    }
}
