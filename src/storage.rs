//! Key-value storage for the comment board's local fallback.
//!
//! Values are opaque strings; the board stores JSON in them.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Persistent string storage keyed by name.
pub trait Storage: Send + Sync {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value for `key`.
    fn set(&self, key: &str, value: String);
}

impl<S: Storage> Storage for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }
}

impl<S: Storage> Storage for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Non-thread-safe map backing [`MemoryStorage`].
pub type StorageMap = FxHashMap<String, String>;

/// In-process storage shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<StorageMap>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a closure with read access to the map.
    pub fn with_read<R>(&self, f: impl FnOnce(&StorageMap) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Execute a closure with write access to the map.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut StorageMap) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.with_read(|m| m.len())
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.with_read(|m| m.is_empty())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.with_read(|m| m.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) {
        self.with_write(|m| {
            m.insert(key.to_string(), value);
        });
    }
}
