//! Start-up recovery: storage probe, corrupted-envelope discard and
//! forward migration of legacy keys.
//!
//! Nothing in here propagates an error. Every failure ends in an empty
//! envelope plus a log line.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::envelope::{write_envelope, Envelope, FORMAT_VERSION};
use super::StoreSettings;
use crate::models::{legacy, EquipmentRecord, LegacyEquipmentReport};
use crate::storage::{self, StorageBackend};

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),

    #[error("none of the {0} stored records could be read")]
    NothingReadable(usize),
}

/// Result of opening a storage medium
#[derive(Debug)]
pub struct Recovered {
    pub envelope: Envelope,
    /// Whether the probe succeeded at start-up
    pub available: bool,
    /// Records copied forward from legacy keys
    pub migrated: usize,
}

fn record_from_value(value: Value) -> Result<EquipmentRecord, serde_json::Error> {
    if legacy::is_legacy(&value) {
        serde_json::from_value::<LegacyEquipmentReport>(value).map(EquipmentRecord::from)
    } else {
        serde_json::from_value(value)
    }
}

/// Deserialize records one by one, dropping the ones that cannot be read,
/// have no barcode, or repeat a barcode already seen.
/// Records in the first-generation layout are translated on the way.
fn records_from_values(values: Vec<Value>) -> Vec<EquipmentRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(values.len());

    for (index, value) in values.into_iter().enumerate() {
        match record_from_value(value) {
            Ok(record) if record.barcode.trim().is_empty() => {
                tracing::warn!(index, "Dropping stored record without barcode");
            }
            Ok(record) => {
                if seen.insert(record.barcode.clone()) {
                    records.push(record);
                } else {
                    tracing::warn!(index, barcode = %record.barcode, "Dropping duplicate stored record");
                }
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Dropping unreadable stored record");
            }
        }
    }

    records
}

/// Parse an envelope stored under the current key
pub fn parse_envelope(raw: &str) -> Result<Envelope, EnvelopeError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut object) = value else {
        return Err(EnvelopeError::InvalidShape("envelope is not an object"));
    };

    let equipments = match object.remove("equipments") {
        Some(Value::Array(items)) => records_from_values(items),
        Some(_) => return Err(EnvelopeError::InvalidShape("equipments is not an array")),
        None => return Err(EnvelopeError::InvalidShape("equipments is missing")),
    };

    let last_updated = object
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let version = object
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Envelope {
        equipments,
        last_updated,
        version,
    })
}

/// Parse a legacy value: either a bare array of records or an envelope
pub fn parse_legacy(raw: &str) -> Result<Vec<EquipmentRecord>, EnvelopeError> {
    let items = match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("equipments") {
            Some(Value::Array(items)) => items,
            _ => return Err(EnvelopeError::InvalidShape("legacy object has no equipments array")),
        },
        _ => return Err(EnvelopeError::InvalidShape("legacy value is neither array nor object")),
    };

    let stored = items.len();
    let records = records_from_values(items);
    if records.is_empty() && stored > 0 {
        return Err(EnvelopeError::NothingReadable(stored));
    }
    Ok(records)
}

/// Read the current key, falling back to an empty envelope.
/// The flag is `true` when the medium must be rewritten.
pub fn load_current(backend: &dyn StorageBackend, key: &str) -> (Envelope, bool) {
    let raw = match backend.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!(key, "No stored records, starting a new envelope");
            return (Envelope::empty(), true);
        }
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to read stored records");
            return (Envelope::empty(), true);
        }
    };

    let mut envelope = match parse_envelope(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding corrupted envelope");
            return (Envelope::empty(), true);
        }
    };

    let mut dirty = false;
    if envelope.version != FORMAT_VERSION {
        tracing::info!(key, from = %envelope.version, to = FORMAT_VERSION, "Upgrading envelope version");
        envelope.version = FORMAT_VERSION.to_string();
        envelope.touch();
        dirty = true;
    }

    tracing::info!(key, total = envelope.equipments.len(), "Stored records loaded");
    (envelope, dirty)
}

/// Probe the medium, load the current envelope and fold legacy keys into it
pub fn initialize(backend: &dyn StorageBackend, settings: &StoreSettings) -> Recovered {
    if !storage::probe(backend) {
        tracing::warn!("Storage medium unavailable, records are kept in memory only");
        return Recovered {
            envelope: Envelope::empty(),
            available: false,
            migrated: 0,
        };
    }

    let (mut envelope, mut dirty) = load_current(backend, &settings.key);
    let mut migrated = 0;
    let mut consumed = Vec::new();

    for legacy_key in &settings.legacy_keys {
        let raw = match backend.get_item(legacy_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(key = %legacy_key, error = %e, "Failed to read legacy key");
                continue;
            }
        };

        match parse_legacy(&raw) {
            Ok(records) => {
                let mut added = 0;
                for record in records {
                    // Records already under the current key are newer.
                    if !envelope.contains(&record.barcode) {
                        envelope.equipments.push(record);
                        added += 1;
                    }
                }
                tracing::info!(key = %legacy_key, added, "Migrated legacy records");
                migrated += added;
                if added > 0 {
                    envelope.touch();
                }
                dirty = true;
            }
            Err(e @ EnvelopeError::NothingReadable(_)) => {
                tracing::warn!(key = %legacy_key, error = %e, "Could not migrate legacy key, leaving it in place");
                continue;
            }
            Err(e) => {
                tracing::warn!(key = %legacy_key, error = %e, "Could not migrate legacy key, discarding it");
            }
        }
        consumed.push(legacy_key.as_str());
    }

    if dirty {
        if let Err(e) = write_envelope(backend, &settings.key, &envelope) {
            tracing::error!(key = %settings.key, error = %e, "Failed to persist recovered envelope");
            // Keep legacy data around so a later start can retry.
            return Recovered {
                envelope,
                available: true,
                migrated,
            };
        }
    }

    for legacy_key in consumed {
        if let Err(e) = backend.remove_item(legacy_key) {
            tracing::warn!(key = legacy_key, error = %e, "Failed to remove legacy key");
        }
    }

    Recovered {
        envelope,
        available: true,
        migrated,
    }
}
