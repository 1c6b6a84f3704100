//! Key-value storage media
//!
//! The record store never talks to a filesystem or a map directly; it goes
//! through [`StorageBackend`], which mirrors the browser storage surface
//! (`getItem` / `setItem` / `removeItem`) so any medium with those three
//! operations can hold an envelope.

pub mod file;
pub mod memory;

use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Key written and removed by [`probe`]
pub const PROBE_KEY: &str = "__storage_test__";

/// Errors raised by a storage medium
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage medium unavailable")]
    Unavailable,

    #[error("quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-keyed, string-valued storage medium
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Check that the medium accepts a write/read/delete cycle
pub fn probe(backend: &dyn StorageBackend) -> bool {
    let cycle = || -> Result<bool, StorageError> {
        backend.set_item(PROBE_KEY, PROBE_KEY)?;
        let read_back = backend.get_item(PROBE_KEY)?;
        backend.remove_item(PROBE_KEY)?;
        Ok(read_back.as_deref() == Some(PROBE_KEY))
    };

    match cycle() {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!("Storage probe read back a different value");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Storage probe failed");
            false
        }
    }
}
