//! Key-value stores backing cart persistence.
//!
//! [`KeyValueStore`] is the seam between the cart engine and wherever state
//! actually lives: a directory of files for the persistent store (the
//! `localStorage` analog) or an in-memory map for the page-local session
//! store (the `sessionStorage` analog) and for tests.
//!
//! Values are opaque strings; serialization is the caller's concern.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Well-known store keys.
pub mod keys {
    /// Persistent key for the serialized cart (a JSON array of line items).
    pub const CART: &str = "cart";

    /// Ephemeral key for the last generated order id, read by the
    /// confirmation page.
    pub const ORDER_ID: &str = "orderId";
}

/// Errors raised by a key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure (unreadable or unwritable storage).
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A string key-value store with synchronous, non-blocking access.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, used for the ephemeral session scope and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one file per key inside a data directory.
///
/// This is the persistent, origin-scoped store. Keys map to
/// `<data_dir>/<key>.json`; keys are fixed constants (see [`keys`]), never
/// user input, so no path sanitization is needed here.
#[derive(Debug)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}
