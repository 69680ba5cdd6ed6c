//! In-memory record store keyed by caller-supplied identifiers.
//!
//! The broker keeps two independent registries, one for instances and one for
//! bindings. Every call takes the lock only for its own map access, so concurrent
//! protocol calls on the same key are serialized without holding anything across
//! operations.

use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Lookup miss for an identifier that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no entry for '{0}'")]
pub struct Missing(pub String);

/// A thread-safe map from identifier to record.
///
/// Cloning is cheap and yields a handle to the same underlying map.
#[derive(Debug)]
pub struct Registry<V> {
    entries: Arc<RwLock<FxHashMap<String, V>>>,
}

impl<V> Clone for Registry<V> {
    fn clone(&self) -> Self {
        Self { entries: Arc::clone(&self.entries) }
    }
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self { entries: Arc::new(RwLock::new(FxHashMap::default())) }
    }
}

impl<V> Registry<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `id` and returns whatever it replaced.
    pub fn put(&self, id: impl Into<String>, record: V) -> Option<V> {
        self.entries.write().insert(id.into(), record)
    }

    /// Removes the record under `id`. Removing an unknown id is not an error.
    pub fn delete(&self, id: &str) -> Option<V> {
        self.entries.write().remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V: Clone> Registry<V> {
    /// Returns a copy of the record under `id`.
    pub fn get(&self, id: &str) -> Result<V, Missing> {
        self.entries.read().get(id).cloned().ok_or_else(|| Missing(id.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn put_get_delete() {
        let registry = Registry::new();
        assert!(registry.put("a", 1).is_none());
        assert_eq!(registry.get("a"), Ok(1));
        assert_eq!(registry.put("a", 2), Some(1));
        assert_eq!(registry.get("a"), Ok(2));
        assert_eq!(registry.delete("a"), Some(2));
        assert_eq!(registry.get("a"), Err(Missing("a".to_owned())));
        assert!(registry.delete("a").is_none());
    }

    #[test]
    fn lookups_use_exact_keys() {
        let registry = Registry::new();
        registry.put("Instance-1", "x");
        assert!(registry.get("instance-1").is_err());
        assert!(registry.contains("Instance-1"));
    }

    #[test]
    fn clones_share_entries() {
        let registry = Registry::new();
        let handle = registry.clone();
        handle.put("k", "v");
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn concurrent_writers_do_not_lose_entries() {
        let registry = Registry::new();
        let workers: Vec<_> = (0..8)
            .map(|worker| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for i in 0..250 {
                        let id = format!("{worker}-{i}");
                        registry.put(id.clone(), i);
                        assert_eq!(registry.get(&id), Ok(i));
                        registry.put("shared", i);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }

        assert_eq!(registry.len(), 8 * 250 + 1);
    }
}
