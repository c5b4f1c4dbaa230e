//! String codecs used to move setting values in and out of the host store.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

/// The value type of a key set.
///
/// Every key of a [`SettingsProxy`](crate::SettingsProxy) shares this type. `serde_json::Value`
/// is the default and accepts any JSON-compatible shape; `String` suits stores where every value
/// is plain text.
pub trait SettingValue: Serialize + DeserializeOwned {
    /// Wrap a raw stored string that could not be decoded as JSON.
    fn from_raw(raw: String) -> Self;

    /// The value as a raw string, if it is one.
    fn as_raw(&self) -> Option<&str>;
}

impl SettingValue for serde_json::Value {
    fn from_raw(raw: String) -> Self {
        serde_json::Value::String(raw)
    }

    fn as_raw(&self) -> Option<&str> {
        self.as_str()
    }
}

impl SettingValue for String {
    fn from_raw(raw: String) -> Self {
        raw
    }

    fn as_raw(&self) -> Option<&str> {
        Some(self)
    }
}

/// An error produced while encoding or decoding a setting value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be represented as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A custom codec rejected the value.
    #[error("{0}")]
    Custom(String),
}

/// Encode function: typed value to stored string.
pub type EncodeFn<V> = Arc<dyn Fn(&V) -> Result<String, CodecError> + Send + Sync>;

/// Decode function: stored string, or its absence, to typed value. Returning `None` means the
/// key has no entry.
pub type DecodeFn<V> = Arc<dyn Fn(Option<&str>) -> Result<Option<V>, CodecError> + Send + Sync>;

/// An encode/decode override pair. Either half may be left unset, in which case resolution falls
/// through to the next tier of the [`CodecPolicy`](crate::policy::CodecPolicy).
///
/// A per-key decode override also acts as an initializer: when the key is missing from the host
/// store it is called once with `None`, and a `Some` result becomes the initial value.
pub struct Codec<V> {
    pub(crate) encode: Option<EncodeFn<V>>,
    pub(crate) decode: Option<DecodeFn<V>>,
}

impl<V> Codec<V> {
    /// A codec that overrides nothing.
    pub fn new() -> Self {
        Self {
            encode: None,
            decode: None,
        }
    }

    /// Override the encode function.
    pub fn with_encode<F>(mut self, encode: F) -> Self
    where
        F: Fn(&V) -> Result<String, CodecError> + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(encode));
        self
    }

    /// Override the decode function.
    pub fn with_decode<F>(mut self, decode: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<Option<V>, CodecError> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(decode));
        self
    }
}

impl<V: SettingValue> Codec<V> {
    /// Identity codec for keys whose values are always plain strings.
    ///
    /// Stored strings are taken verbatim, and string values are written without JSON quoting.
    /// Non-string values are still written as JSON.
    pub fn plain_text() -> Self {
        Self::new()
            .with_decode(|raw| Ok(raw.map(|raw| V::from_raw(raw.to_owned()))))
            .with_encode(|value: &V| match value.as_raw() {
                Some(raw) => Ok(raw.to_owned()),
                None => default_encode(value),
            })
    }
}

impl<V> Default for Codec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Codec<V> {
    fn clone(&self) -> Self {
        Self {
            encode: self.encode.clone(),
            decode: self.decode.clone(),
        }
    }
}

impl<V> std::fmt::Debug for Codec<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .finish()
    }
}

/// Built-in decode: absent stays absent, valid JSON is parsed, and anything else is kept as the
/// raw string. Never fails.
pub fn default_decode<V: SettingValue>(raw: Option<&str>) -> Option<V> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            debug!(%error, "Stored value is not valid JSON, keeping the raw string");
            Some(V::from_raw(raw.to_owned()))
        }
    }
}

/// Built-in encode: always JSON, strings included, so that decoding the result gives the value
/// back.
pub fn default_encode<V: Serialize + ?Sized>(value: &V) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}
