use thiserror::Error;

use crate::{codec::CodecError, host::HostStoreError};

/// Errors that can occur when working with a [`SettingsProxy`](crate::SettingsProxy).
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A configured decode override failed.
    #[error("Failed to decode setting '{key}': {source}")]
    Decode {
        /// The setting key.
        key: String,
        /// The codec failure.
        source: CodecError,
    },

    /// A configured encode override failed, or the value could not be represented as JSON.
    #[error("Failed to encode setting '{key}': {source}")]
    Encode {
        /// The setting key.
        key: String,
        /// The codec failure.
        source: CodecError,
    },

    /// Host store operation failed
    #[error(transparent)]
    HostStore(#[from] HostStoreError),

    /// Failed to convert between a typed setting and the stored value
    #[error("Failed to convert setting: {0}")]
    Json(#[from] serde_json::Error),
}
