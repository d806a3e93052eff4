//! Generic observable state persisted under one storage key.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::observable::{Observable, Subscription};
use crate::storage::KeyValueStore;

/// An [`Observable`] whose every value is written to a [`KeyValueStore`].
///
/// The stored JSON is read once at construction. Missing or malformed data
/// yields `T::default()` - a tampered storage entry must never brick the UI.
pub struct PersistentStore<T> {
    key: &'static str,
    storage: Arc<dyn KeyValueStore>,
    state: Observable<T>,
}

impl<T> Clone for PersistentStore<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            storage: Arc::clone(&self.storage),
            state: self.state.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore")
            .field("key", &self.key)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T> PersistentStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static,
{
    /// Load the value under `key`, falling back to the default.
    pub fn load(key: &'static str, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load_with(key, storage, |value| value)
    }

    /// Load the value under `key` and pass it through `repair` before use.
    ///
    /// Use this to re-establish invariants that stored data may violate.
    pub fn load_with(
        key: &'static str,
        storage: Arc<dyn KeyValueStore>,
        repair: impl FnOnce(T) -> T,
    ) -> Self {
        let initial = read_json(storage.as_ref(), key).map_or_else(T::default, repair);
        Self {
            key,
            storage,
            state: Observable::new(initial),
        }
    }

    /// Snapshot of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.state.get()
    }

    /// Persist `value` and publish it to subscribers.
    ///
    /// A failed write is logged; the new value is still published so the
    /// in-memory state and the UI stay consistent for this run.
    pub fn replace(&self, value: T) {
        match serde_json::to_string(&value) {
            Ok(json) => {
                if let Err(e) = self.storage.set(self.key, &json) {
                    tracing::warn!(key = self.key, error = %e, "Failed to persist state");
                }
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "Failed to serialize state");
            }
        }
        self.state.set(value);
    }

    /// Apply `f` to a copy of the current value, then persist and publish it.
    ///
    /// Returns whatever `f` returns.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut value = self.get();
        let result = f(&mut value);
        self.replace(value);
        result
    }

    /// Remove the storage key and publish the default value.
    pub fn reset(&self) {
        if let Err(e) = self.storage.remove(self.key) {
            tracing::warn!(key = self.key, error = %e, "Failed to clear persisted state");
        }
        self.state.set(T::default());
    }

    /// Subscribe to the current and future values.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }
}

/// Read and decode the JSON stored under `key`, treating corruption as absence.
pub(crate) fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored value");
            None
        }
    }
}
