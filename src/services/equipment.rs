//! Equipment service

use std::sync::Arc;

use chrono::Utc;

use crate::{
    barcode,
    models::EquipmentRecord,
    store::{RecordStore, SearchField, StoreStats},
};

/// Attempts at drawing a barcode not already used in the store
const BARCODE_ATTEMPTS: usize = 8;

#[derive(Clone)]
pub struct EquipmentService {
    store: Arc<RecordStore>,
}

impl EquipmentService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<EquipmentRecord> {
        self.store.load_all()
    }

    pub fn get(&self, barcode: &str) -> Option<EquipmentRecord> {
        self.store.get(barcode)
    }

    pub fn search(&self, query: &str, field: SearchField) -> Vec<EquipmentRecord> {
        self.store.search(query, field)
    }

    /// Save a submitted report, stamping its generation time when missing.
    /// Returns the stored record when the save reached the medium.
    pub fn submit(&self, mut record: EquipmentRecord) -> (bool, EquipmentRecord) {
        if record.generated_at.is_none() {
            record.generated_at = Some(Utc::now());
        }
        let saved = self.store.save(&record);
        (saved, record)
    }

    pub fn delete(&self, barcode: &str) -> bool {
        self.store.delete(barcode)
    }

    pub fn clear(&self) -> bool {
        self.store.clear()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    pub fn is_available(&self) -> bool {
        self.store.is_available()
    }

    /// Drop the cache and read the medium again
    pub fn reload(&self) -> usize {
        self.store.reload().len()
    }

    /// Fresh barcode for a new form, avoiding codes already stored
    pub fn new_barcode(&self) -> String {
        let mut code = barcode::generate();
        for _ in 1..BARCODE_ATTEMPTS {
            if self.store.get(&code).is_none() {
                break;
            }
            code = barcode::generate();
        }
        code
    }
}
