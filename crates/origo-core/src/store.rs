//! # Source Store
//!
//! Concurrency-safe map from `Id` to `Source`, backed by `DashMap`.
//!
//! Every single-key operation is atomic with respect to that key. `range`
//! is weakly consistent: entries written or removed while it runs may or may
//! not be visited.

use crate::{Id, Source};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Owner of every `Source` for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SourceStore {
    entries: DashMap<Id, Source>,
}

impl SourceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the value stored under `key`.
    #[must_use]
    pub fn load(&self, key: Id) -> Option<Source> {
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    /// Insert or overwrite.
    pub fn store(&self, key: Id, value: Source) {
        self.entries.insert(key, value);
    }

    /// Remove `key`. Absent keys are ignored.
    pub fn delete(&self, key: Id) {
        self.entries.remove(&key);
    }

    /// Visit every entry in unspecified order until `visit` returns false.
    ///
    /// `visit` runs while a shard read lock is held and must not write to
    /// this store.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(Id, &Source) -> bool,
    {
        for entry in &self.entries {
            if !visit(*entry.key(), entry.value()) {
                break;
            }
        }
    }

    /// Insert only if `key` is vacant. Returns true if inserted.
    pub fn insert_if_absent(&self, key: Id, value: Source) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                true
            }
        }
    }

    /// Mutate the value under `key` in place and return a copy of the result.
    ///
    /// Returns `None` without calling `mutate` if `key` is absent.
    pub fn update<F>(&self, key: Id, mutate: F) -> Option<Source>
    where
        F: FnOnce(&mut Source),
    {
        let mut entry = self.entries.get_mut(&key)?;
        mutate(entry.value_mut());
        Some(entry.value().clone())
    }

    /// Remove `key` and return what was stored there.
    pub fn remove(&self, key: Id) -> Option<Source> {
        self.entries.remove(&key).map(|(_, value)| value)
    }

    /// Number of stored sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
