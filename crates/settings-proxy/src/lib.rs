#![doc = include_str!("../README.md")]

/// String codecs and the built-in JSON encode/decode policy.
pub mod codec;

/// The host key/value store seam and its SQLite implementation.
pub mod host;

/// Per-key codec configuration and resolution.
pub mod policy;

mod error;
mod key;
mod proxy;

pub use codec::{Codec, CodecError, SettingValue};
pub use error::SettingsError;
#[cfg(feature = "sqlite")]
pub use host::SqliteStore;
pub use host::{HostStore, HostStoreError};
pub use key::Key;
pub use policy::CodecConfig;
pub use proxy::{Patch, Setting, SettingsProxy, Tracked};
