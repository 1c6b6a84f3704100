//! Equipment record store
//!
//! One JSON envelope of [`EquipmentRecord`]s lives under a single key of a
//! [`StorageBackend`]. The store keeps the envelope cached and applies a
//! mutation to the cache only once the medium accepted it. Every failure
//! turns into `false` or an empty result; the medium is untrusted and nothing
//! here is allowed to panic or bubble an error up to callers.

pub mod envelope;
pub mod recovery;
pub mod search;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use utoipa::ToSchema;
use validator::Validate;

use crate::events::{StoreEvent, StoreEvents};
use crate::models::EquipmentRecord;
use crate::storage::{self, StorageBackend};

pub use envelope::{Envelope, FORMAT_VERSION};
pub use search::SearchField;

/// Key holding the current envelope
pub const DEFAULT_KEY: &str = "gray_think_equipments_v2";

/// Keys written by earlier format versions
pub const DEFAULT_LEGACY_KEYS: [&str; 2] = ["gray_think_equipments", "equipment_reports"];

/// Where the store keeps its envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub key: String,
    pub legacy_keys: Vec<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Summary counters derived from the envelope
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub count: usize,
    pub last_updated: DateTime<Utc>,
    pub version: String,
}

pub struct RecordStore {
    backend: Arc<dyn StorageBackend>,
    settings: StoreSettings,
    envelope: Mutex<Envelope>,
    events: StoreEvents,
}

impl RecordStore {
    /// Open the store, running the probe, recovery and legacy migration
    pub fn open(backend: Arc<dyn StorageBackend>, settings: StoreSettings, events: StoreEvents) -> Self {
        let recovered = recovery::initialize(backend.as_ref(), &settings);
        tracing::info!(
            key = %settings.key,
            total = recovered.envelope.equipments.len(),
            migrated = recovered.migrated,
            available = recovered.available,
            "Record store opened"
        );

        Self {
            backend,
            settings,
            envelope: Mutex::new(recovered.envelope),
            events,
        }
    }

    /// Listen for mutations that reached the medium
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Whether the medium currently accepts writes
    pub fn is_available(&self) -> bool {
        storage::probe(self.backend.as_ref())
    }

    fn envelope(&self) -> MutexGuard<'_, Envelope> {
        self.envelope.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Record store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn persist(&self, envelope: &Envelope) -> bool {
        if !storage::probe(self.backend.as_ref()) {
            tracing::warn!(key = %self.settings.key, "Storage unavailable, change kept in memory only");
            return false;
        }

        match envelope::write_envelope(self.backend.as_ref(), &self.settings.key, envelope) {
            Ok(()) => {
                tracing::debug!(key = %self.settings.key, total = envelope.equipments.len(), "Envelope persisted");
                true
            }
            Err(e) => {
                tracing::error!(key = %self.settings.key, error = %e, "Failed to persist envelope");
                false
            }
        }
    }

    /// Insert or replace the record with the same barcode.
    ///
    /// Returns `false` for an invalid record or when the medium refused the
    /// write; in both cases the store is left as it was.
    pub fn save(&self, record: &EquipmentRecord) -> bool {
        if record.barcode.trim().is_empty() {
            tracing::warn!("Refusing to save a record without barcode");
            return false;
        }
        // NaN and infinities serialize as null and would not read back.
        if !record.cost.is_finite() {
            tracing::warn!(barcode = %record.barcode, "Refusing to save a record with a non-finite cost");
            return false;
        }
        if let Err(e) = record.validate() {
            tracing::warn!(barcode = %record.barcode, error = %e, "Refusing to save an invalid record");
            return false;
        }

        let mut envelope = self.envelope();
        let mut next = envelope.clone();
        let replaced = next.upsert(record.clone());
        next.touch();
        let total = next.equipments.len();

        if !self.persist(&next) {
            return false;
        }
        *envelope = next;

        tracing::info!(barcode = %record.barcode, replaced, total, "Record saved");
        self.events.publish(StoreEvent::RecordSaved {
            record: Box::new(record.clone()),
            total,
            at: envelope.last_updated,
        });
        true
    }

    /// Copy of every stored record, in insertion order
    pub fn load_all(&self) -> Vec<EquipmentRecord> {
        self.envelope().equipments.clone()
    }

    /// Re-read the medium, replacing the cache.
    ///
    /// Picks up writes made by another process sharing the medium. Unreadable
    /// or corrupted content resets the store to an empty envelope.
    pub fn reload(&self) -> Vec<EquipmentRecord> {
        let (fresh, dirty) = recovery::load_current(self.backend.as_ref(), &self.settings.key);
        let mut envelope = self.envelope();
        *envelope = fresh;
        if dirty {
            self.persist(&envelope);
        }
        envelope.equipments.clone()
    }

    pub fn get(&self, barcode: &str) -> Option<EquipmentRecord> {
        let envelope = self.envelope();
        envelope
            .position(barcode)
            .map(|index| envelope.equipments[index].clone())
    }

    pub fn search(&self, query: &str, field: SearchField) -> Vec<EquipmentRecord> {
        search::filter(&self.envelope().equipments, query, field)
    }

    /// Remove one record; `true` only if it existed and the removal persisted
    pub fn delete(&self, barcode: &str) -> bool {
        let mut envelope = self.envelope();
        if !envelope.contains(barcode) {
            tracing::debug!(barcode, "Nothing to delete");
            return false;
        }
        let mut next = envelope.clone();
        next.remove(barcode);
        next.touch();
        let total = next.equipments.len();

        if !self.persist(&next) {
            return false;
        }
        *envelope = next;

        tracing::info!(barcode, total, "Record deleted");
        self.events.publish(StoreEvent::RecordDeleted {
            barcode: barcode.to_string(),
            total,
            at: envelope.last_updated,
        });
        true
    }

    /// Replace everything with a fresh empty envelope
    pub fn clear(&self) -> bool {
        let mut envelope = self.envelope();
        let next = Envelope::empty();

        if !self.persist(&next) {
            return false;
        }
        *envelope = next;

        tracing::info!("Record store cleared");
        self.events.publish(StoreEvent::StoreCleared {
            at: envelope.last_updated,
        });
        true
    }

    pub fn stats(&self) -> StoreStats {
        let envelope = self.envelope();
        StoreStats {
            count: envelope.equipments.len(),
            last_updated: envelope.last_updated,
            version: envelope.version.clone(),
        }
    }
}
