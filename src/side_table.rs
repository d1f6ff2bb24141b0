use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Identity-keyed annotations on `Arc`-owned objects
///
/// The table holds only a `Weak` to each key, so it never keeps a key alive.
/// While that `Weak` exists the key's allocation cannot be reused, which
/// makes the pointer address a stable identity. Entries whose key has been
/// dropped read as absent and are pruned on the next insert.
pub struct SideTable<V> {
    entries: Mutex<HashMap<usize, Entry<V>>>,
}

struct Entry<V> {
    key: Weak<dyn Any + Send + Sync>,
    value: V,
}

impl<V: Clone> SideTable<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Associate `value` with `key`, returning the previous live value
    pub fn insert<K: Any + Send + Sync>(&self, key: &Arc<K>, value: V) -> Option<V> {
        let erased: Arc<dyn Any + Send + Sync> = key.clone();
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.key.strong_count() > 0);
        entries
            .insert(
                identity(key),
                Entry {
                    key: Arc::downgrade(&erased),
                    value,
                },
            )
            .map(|previous| previous.value)
    }

    pub fn get<K: Any + Send + Sync>(&self, key: &Arc<K>) -> Option<V> {
        self.lock()
            .get(&identity(key))
            .filter(|entry| entry.key.strong_count() > 0)
            .map(|entry| entry.value.clone())
    }

    pub fn contains<K: Any + Send + Sync>(&self, key: &Arc<K>) -> bool {
        self.get(key).is_some()
    }

    pub fn remove<K: Any + Send + Sync>(&self, key: &Arc<K>) -> Option<V> {
        self.lock()
            .remove(&identity(key))
            .map(|entry| entry.value)
    }

    /// Number of entries whose key is still alive
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.key.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for SideTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn identity<K>(key: &Arc<K>) -> usize {
    Arc::as_ptr(key) as *const () as usize
}
