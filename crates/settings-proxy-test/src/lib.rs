#![doc = "Test helpers for the settings-proxy crate."]

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use settings_proxy::{HostStore, HostStoreError};

/// A call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `entries()`
    Entries,
    /// `set_item(key, value)`
    Set(String, String),
    /// `remove_item(key)`
    Remove(String),
}

/// An in-memory host store that records every call made to it.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<StoreCall>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// A store pre-populated with `entries`. Seeding is not recorded as calls.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store.entries.lock().expect("Mutex is not poisoned").extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// The stored string for `key`.
    pub fn item(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("Mutex is not poisoned")
            .get(key)
            .cloned()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("Mutex is not poisoned").clone()
    }

    /// The `Set` and `Remove` calls received so far, in order.
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != StoreCall::Entries)
            .collect()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.calls.lock().expect("Mutex is not poisoned").clear();
    }

    /// Make every later write or removal of `key` fail.
    pub fn fail_writes_for(&self, key: &str) {
        self.failing
            .lock()
            .expect("Mutex is not poisoned")
            .insert(key.to_owned());
    }

    /// Undo [`fail_writes_for`](Self::fail_writes_for) for `key`.
    pub fn allow_writes_for(&self, key: &str) {
        self.failing
            .lock()
            .expect("Mutex is not poisoned")
            .remove(key);
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("Mutex is not poisoned").push(call);
    }

    fn check_failing(&self, key: &str) -> Result<(), HostStoreError> {
        if self
            .failing
            .lock()
            .expect("Mutex is not poisoned")
            .contains(key)
        {
            return Err(HostStoreError::Internal(format!("write to {key} rejected")));
        }
        Ok(())
    }
}

impl HostStore for MemoryStore {
    fn entries(&self) -> Result<HashMap<String, String>, HostStoreError> {
        self.record(StoreCall::Entries);
        Ok(self.entries.lock().expect("Mutex is not poisoned").clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), HostStoreError> {
        self.record(StoreCall::Set(key.to_owned(), value.to_owned()));
        self.check_failing(key)?;
        self.entries
            .lock()
            .expect("Mutex is not poisoned")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), HostStoreError> {
        self.record(StoreCall::Remove(key.to_owned()));
        self.check_failing(key)?;
        self.entries
            .lock()
            .expect("Mutex is not poisoned")
            .remove(key);
        Ok(())
    }
}
