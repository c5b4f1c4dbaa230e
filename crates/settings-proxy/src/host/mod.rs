use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// An error resulting from operations on a host store.
#[derive(Error, Debug)]
pub enum HostStoreError {
    /// An internal unspecified error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The table name contains characters other than ASCII letters and underscores.
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    /// An internal database error.
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// The string-keyed key/value store wrapped by a [`SettingsProxy`](crate::SettingsProxy).
///
/// The proxy reads every entry once when it is constructed and afterwards only writes. Methods
/// take `&self`; implementations handle their own interior mutability.
pub trait HostStore: Send + Sync {
    /// Every entry currently in the store.
    fn entries(&self) -> Result<HashMap<String, String>, HostStoreError>;
    /// Sets `key` to `value`, replacing any existing entry.
    fn set_item(&self, key: &str, value: &str) -> Result<(), HostStoreError>;
    /// Removes the entry for `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), HostStoreError>;
}

/// Validate that the provided name is usable as a table name.
/// Valid characters are a-z, A-Z, and underscore (_).
pub const fn validate_table_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if !(byte.is_ascii_alphabetic() || byte == b'_') {
            return false;
        }
        i += 1;
    }
    true
}
