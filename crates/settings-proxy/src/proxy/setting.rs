//! Typed access to individual settings.

use serde::{de::DeserializeOwned, Serialize};

use super::{Patch, SettingsProxy};
use crate::{codec::SettingValue, Key, SettingsError};

/// A handle to a single setting value, typed by its [`Key`].
///
/// The proxy stores every key as its value type `V`; the handle converts to and from `T`
/// through `serde_json`.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use settings_proxy::{register_setting_key, CodecConfig, SettingsProxy, SqliteStore};
///
/// register_setting_key!(const FONT_SIZE: u32 = "font_size");
///
/// let store = Arc::new(SqliteStore::open_in_memory("settings")?);
/// let mut settings: SettingsProxy = SettingsProxy::new(store, CodecConfig::new())?;
///
/// let mut font_size = settings.setting(FONT_SIZE);
/// assert_eq!(font_size.get()?, None);
///
/// font_size.update(&14)?;
/// assert_eq!(font_size.get()?, Some(14));
///
/// font_size.delete()?;
/// assert_eq!(font_size.get()?, None);
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct Setting<'a, T, V> {
    proxy: &'a mut SettingsProxy<V>,
    key: Key<T>,
}

impl<'a, T, V: SettingValue> Setting<'a, T, V> {
    pub(super) fn new(proxy: &'a mut SettingsProxy<V>, key: Key<T>) -> Self {
        Self { proxy, key }
    }

    /// Get the current value of this setting.
    ///
    /// Returns `None` if the setting has no value.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value does not match `T`, which may indicate:
    /// - Schema evolution problems (type definition changed)
    /// - A raw string kept by the fallback decode
    /// - Type mismatch (wrong `Key<T>` type for stored data)
    pub fn get(&self) -> Result<Option<T>, SettingsError>
    where
        T: DeserializeOwned,
    {
        match self.proxy.get().get(self.key.name()) {
            Some(value) => Ok(Some(serde_json::from_value(serde_json::to_value(value)?)?)),
            None => Ok(None),
        }
    }

    /// Update (or create) this setting with a new value, persisting it immediately.
    pub fn update(&mut self, value: &T) -> Result<(), SettingsError>
    where
        T: Serialize,
    {
        let value: V = serde_json::from_value(serde_json::to_value(value)?)?;
        self.proxy.update([(self.key.name(), Patch::Value(value))])
    }

    /// Delete this setting from memory and from the host store.
    pub fn delete(&mut self) -> Result<(), SettingsError> {
        self.proxy.update([(self.key.name(), Patch::Remove)])
    }
}
