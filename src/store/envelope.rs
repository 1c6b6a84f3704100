//! Persisted envelope around the record collection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EquipmentRecord;
use crate::storage::{StorageBackend, StorageError};

/// Format tag written into every envelope
pub const FORMAT_VERSION: &str = "2.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub equipments: Vec<EquipmentRecord>,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

impl Envelope {
    pub fn empty() -> Self {
        Self {
            equipments: Vec::new(),
            last_updated: Utc::now(),
            version: FORMAT_VERSION.to_string(),
        }
    }

    pub fn position(&self, barcode: &str) -> Option<usize> {
        self.equipments.iter().position(|r| r.barcode == barcode)
    }

    pub fn contains(&self, barcode: &str) -> bool {
        self.position(barcode).is_some()
    }

    /// Replace the record with the same barcode in place, or append.
    /// Returns `true` when an existing record was replaced.
    pub fn upsert(&mut self, record: EquipmentRecord) -> bool {
        match self.position(&record.barcode) {
            Some(index) => {
                self.equipments[index] = record;
                true
            }
            None => {
                self.equipments.push(record);
                false
            }
        }
    }

    /// Remove the record with `barcode`, returning whether one was removed
    pub fn remove(&mut self, barcode: &str) -> bool {
        let before = self.equipments.len();
        self.equipments.retain(|r| r.barcode != barcode);
        self.equipments.len() < before
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::empty()
    }
}

/// Serialize and store the envelope, then confirm the medium kept it
pub fn write_envelope(
    backend: &dyn StorageBackend,
    key: &str,
    envelope: &Envelope,
) -> Result<(), StorageError> {
    let serialized = serde_json::to_string(envelope)?;
    backend.set_item(key, &serialized)?;

    match backend.get_item(key)? {
        Some(stored) if !stored.is_empty() => Ok(()),
        _ => Err(StorageError::Unavailable),
    }
}
