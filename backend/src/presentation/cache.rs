//! Path-keyed query cache shared by the storefront views.
//!
//! Entries are keyed by the request path that produced them (for example
//! `/api/cart`). A mutation that changes server state invalidates the key so
//! the next read refetches.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

type Entry = Arc<dyn Any + Send + Sync>;

/// Shared cache of decoded API responses.
///
/// Cloning is cheap and every clone observes the same entries.
///
/// # Examples
/// ```
/// use storefront::presentation::QueryCache;
///
/// let cache = QueryCache::new();
/// cache.put("/api/cart", vec![1_u32, 2]);
/// assert_eq!(cache.get::<Vec<u32>>("/api/cart"), Some(vec![1, 2]));
///
/// cache.invalidate("/api/cart");
/// assert!(cache.get::<Vec<u32>>("/api/cart").is_none());
/// ```
#[derive(Clone, Default)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl QueryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Entries are swapped whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value for `key`, if present and of type `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entry = self.lock().get(key).cloned()?;
        entry.downcast_ref::<T>().cloned()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        self.lock().insert(key.into(), Arc::new(value));
    }

    /// Drop the entry for `key` so the next read refetches.
    pub fn invalidate(&self, key: &str) {
        if self.lock().remove(key).is_some() {
            debug!(key, "query cache entry invalidated");
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether an entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}
