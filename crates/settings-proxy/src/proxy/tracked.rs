use std::collections::{HashMap, HashSet};

use tracing::trace;

/// Mutation-tracking view returned by
/// [`SettingsProxy::get_to_update`](super::SettingsProxy::get_to_update).
///
/// Every access marks the key dirty, whether or not the value is then changed. Dirty keys are
/// written on the next [`commit`](super::SettingsProxy::commit). Accessing a key that has no
/// value still marks it, and the commit then removes it from the host store.
pub struct Tracked<'a, V> {
    values: &'a mut HashMap<String, V>,
    dirty: &'a mut HashSet<String>,
}

impl<'a, V> Tracked<'a, V> {
    pub(super) fn new(values: &'a mut HashMap<String, V>, dirty: &'a mut HashSet<String>) -> Self {
        Self { values, dirty }
    }

    /// The live value for `key`, for in-place mutation.
    pub fn get(&mut self, key: &str) -> Option<&mut V> {
        self.mark(key);
        self.values.get_mut(key)
    }

    /// Replace the value for `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        self.mark(&key);
        self.values.insert(key, value)
    }

    /// Remove the value for `key`, returning it.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.mark(key);
        self.values.remove(key)
    }

    fn mark(&mut self, key: &str) {
        if !self.dirty.contains(key) {
            trace!(key, "Marking setting dirty");
            self.dirty.insert(key.to_owned());
        }
    }
}
