use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::{debug, trace};

use crate::{
    codec::SettingValue,
    host::HostStore,
    policy::{CodecConfig, CodecPolicy},
    Key, SettingsError,
};

mod setting;
mod tracked;

pub use setting::Setting;
pub use tracked::Tracked;

/// A value in a bulk [`SettingsProxy::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<V> {
    /// Replace the in-memory value, then persist it.
    Value(V),
    /// Remove the key from memory and from the host store.
    Remove,
    /// Persist the current in-memory value unchanged. Use this after mutating a value through
    /// [`SettingsProxy::get_mut`].
    AsIs,
}

impl<V> From<V> for Patch<V> {
    fn from(value: V) -> Self {
        Patch::Value(value)
    }
}

/// Typed view over a string key/value [`HostStore`].
///
/// Values are decoded once, when the proxy is created, and kept in memory. Writes through
/// [`update`](Self::update) are encoded and persisted immediately. Writes through the
/// [`get_to_update`](Self::get_to_update) view are persisted on [`commit`](Self::commit).
///
/// ```rust
/// use std::sync::Arc;
///
/// use serde_json::{json, Value};
/// use settings_proxy::{CodecConfig, HostStore, Patch, SettingsProxy, SqliteStore};
///
/// let store = Arc::new(SqliteStore::open_in_memory("settings")?);
/// store.set_item("recent", "[1,2,3]")?;
///
/// let mut settings: SettingsProxy = SettingsProxy::new(store.clone(), CodecConfig::new())?;
/// assert_eq!(settings.get()["recent"], json!([1, 2, 3]));
///
/// settings.update([("theme", Patch::Value(json!("dark")))])?;
/// assert_eq!(store.entries()?["theme"], "\"dark\"");
///
/// if let Some(recent) = settings.get_to_update().get("recent").and_then(Value::as_array_mut) {
///     recent.push(json!(4));
/// }
/// settings.commit()?;
/// assert_eq!(store.entries()?["recent"], "[1,2,3,4]");
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct SettingsProxy<V = serde_json::Value> {
    store: Arc<dyn HostStore>,
    policy: CodecPolicy<V>,
    values: HashMap<String, V>,
    dirty: HashSet<String>,
}

impl<V> std::fmt::Debug for SettingsProxy<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProxy")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<V: SettingValue> SettingsProxy<V> {
    /// Load every entry of `store` and decode it with the codec resolved for its key.
    ///
    /// Keys missing from the store that have a per-key decode override are initialized by
    /// calling that override with no input. Stored entries always take precedence.
    pub fn new(store: Arc<dyn HostStore>, config: CodecConfig<V>) -> Result<Self, SettingsError> {
        let policy = CodecPolicy::from(config);
        let entries = store.entries()?;

        let mut values = HashMap::with_capacity(entries.len());
        for (key, raw) in &entries {
            if let Some(value) = decode(&policy, key, Some(raw.as_str()))? {
                values.insert(key.clone(), value);
            }
        }

        let mut initialized = 0;
        for key in policy.initializer_keys() {
            if entries.contains_key(key) {
                continue;
            }
            if let Some(value) = decode(&policy, key, None)? {
                values.insert(key.to_owned(), value);
                initialized += 1;
            }
        }

        debug!(
            stored = entries.len(),
            loaded = values.len(),
            initialized,
            "Loaded settings from host store"
        );

        Ok(Self {
            store,
            policy,
            values,
            dirty: HashSet::new(),
        })
    }

    /// The current values.
    pub fn get(&self) -> &HashMap<String, V> {
        &self.values
    }

    /// The current values, mutable in place.
    ///
    /// Changes made here are not persisted until the key is passed to
    /// [`update`](Self::update) as [`Patch::AsIs`]. Use [`get_to_update`](Self::get_to_update)
    /// to have the keys tracked instead.
    pub fn get_mut(&mut self) -> &mut HashMap<String, V> {
        &mut self.values
    }

    /// Apply `partial` key by key: store each new value in memory and persist it. Keys not
    /// mentioned are left untouched.
    ///
    /// Stops at the first failure. Keys processed before it remain persisted.
    pub fn update<K, I>(&mut self, partial: I) -> Result<(), SettingsError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Patch<V>)>,
    {
        for (key, patch) in partial {
            let key = key.into();
            match patch {
                Patch::Value(value) => {
                    self.values.insert(key.clone(), value);
                }
                Patch::Remove => {
                    self.values.remove(&key);
                }
                Patch::AsIs => {}
            }
            self.persist(&key)?;
        }
        Ok(())
    }

    /// A view whose accessors mark keys dirty for the next [`commit`](Self::commit).
    pub fn get_to_update(&mut self) -> Tracked<'_, V> {
        Tracked::new(&mut self.values, &mut self.dirty)
    }

    /// Persist every key accessed through [`get_to_update`](Self::get_to_update) since the last
    /// commit, then clear the dirty set.
    ///
    /// If a key fails to persist, it and every key not yet flushed stay dirty.
    pub fn commit(&mut self) -> Result<(), SettingsError> {
        if self.dirty.is_empty() {
            return Ok(());
        }

        debug!(count = self.dirty.len(), "Committing dirty settings");
        let mut pending = std::mem::take(&mut self.dirty).into_iter();
        while let Some(key) = pending.next() {
            if let Err(error) = self.persist(&key) {
                self.dirty.insert(key);
                self.dirty.extend(pending);
                return Err(error);
            }
        }
        Ok(())
    }

    /// Whether `key` has been accessed through [`get_to_update`](Self::get_to_update) since the
    /// last commit.
    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }

    /// Keys pending the next [`commit`](Self::commit), in no particular order.
    pub fn dirty_keys(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// A typed handle for a single key.
    pub fn setting<T>(&mut self, key: Key<T>) -> Setting<'_, T, V> {
        Setting::new(self, key)
    }

    /// Write the in-memory value of `key` to the host store, or remove the entry if there is
    /// none. Encode is never called for an absent value.
    fn persist(&self, key: &str) -> Result<(), SettingsError> {
        match self.values.get(key) {
            Some(value) => {
                let raw = self
                    .policy
                    .encoder(key)
                    .encode(value)
                    .map_err(|source| SettingsError::Encode {
                        key: key.to_owned(),
                        source,
                    })?;
                trace!(key, "Writing setting");
                self.store.set_item(key, &raw)?;
            }
            None => {
                trace!(key, "Removing setting");
                self.store.remove_item(key)?;
            }
        }
        Ok(())
    }
}

fn decode<V: SettingValue>(
    policy: &CodecPolicy<V>,
    key: &str,
    raw: Option<&str>,
) -> Result<Option<V>, SettingsError> {
    policy
        .decoder(key)
        .decode(raw)
        .map_err(|source| SettingsError::Decode {
            key: key.to_owned(),
            source,
        })
}
