use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::StoreError;

// -----------------------------------------------------------------------------
// SecureStore

/// A store of opaque strings, such as a platform keychain.
///
/// Methods take `&self`; implementations synchronize internally.
pub trait SecureStore {
    /// Name of the service the entries belong to.
    fn service(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, or remove the entry when `value` is `None`.
    fn set(&self, key: &str, value: Option<&str>) -> Result<(), StoreError>;

    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

// -----------------------------------------------------------------------------
// MemoryStore

/// A [`SecureStore`] held in memory.
///
/// Its content can be saved and restored as JSON text with
/// [`snapshot`](Self::snapshot) and [`restore`](Self::restore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    service: String,
    entries: RwLock<BTreeMap<String, String>>,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    service: String,
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entries: RwLock::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    /// The service name and every entry, as JSON text.
    pub fn snapshot(&self) -> Result<String, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        let snapshot = Snapshot {
            service: self.service.clone(),
            entries: entries.clone(),
        };
        serde_json::to_string(&snapshot).map_err(StoreError::Snapshot)
    }

    /// A store holding the content of a [`snapshot`](Self::snapshot).
    pub fn restore(text: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(text).map_err(StoreError::Snapshot)?;
        Ok(Self {
            service: snapshot.service,
            entries: RwLock::new(snapshot.entries),
        })
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::backend("memory store lock poisoned")
}

impl SecureStore for MemoryStore {
    fn service(&self) -> &str {
        &self.service
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        match value {
            Some(value) => {
                entries.insert(key.to_owned(), value.to_owned());
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

// -----------------------------------------------------------------------------
// Tests
