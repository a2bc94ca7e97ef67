//! Durable cart storage.
//!
//! The stored record is a JSON array of [`CartLine`]s under a fixed key, the
//! same shape the browser kept in local storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use thiserror::Error;

use super::CartLine;

/// Fixed storage key for the cart record.
pub const STORAGE_KEY: &str = "tire_disciples_cart";

/// Errors from a cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cart storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored cart is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("cart storage lock poisoned")]
    Poisoned,
}

/// Load/save adapter for the cart record.
pub trait CartStore {
    /// Read the stored lines. `Ok(None)` means nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<Vec<CartLine>>, StoreError>;

    /// Replace the stored lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, lines: &[CartLine]) -> Result<(), StoreError>;
}

/// Cart record kept as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named after [`STORAGE_KEY`] inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORAGE_KEY}.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<CartLine>>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StoreError> {
        let json = serde_json::to_string(lines)?;
        // Write-then-rename so a crash never leaves half a record behind.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store holding the serialized record.
///
/// Clones share the same record, so a test can keep a handle and inspect
/// what the cart wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw record.
    #[must_use]
    pub fn with_record(json: impl Into<String>) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(json.into()))),
        }
    }

    /// The raw record, if anything was saved.
    #[must_use]
    pub fn record(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }
}

impl CartStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<CartLine>>, StoreError> {
        let record = self.record.lock().map_err(|_| StoreError::Poisoned)?;
        record
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StoreError::from)
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StoreError> {
        let json = serde_json::to_string(lines)?;
        *self.record.lock().map_err(|_| StoreError::Poisoned)? = Some(json);
        Ok(())
    }
}
