//! Per-key codec resolution.

use std::collections::HashMap;

use crate::codec::{
    default_decode, default_encode, Codec, CodecError, DecodeFn, EncodeFn, SettingValue,
};

/// Codec configuration for a [`SettingsProxy`](crate::SettingsProxy).
///
/// # Example
/// ```rust
/// use settings_proxy::{Codec, CodecConfig};
/// use serde_json::Value;
///
/// let config = CodecConfig::<Value>::new()
///     .key("theme", Codec::plain_text())
///     .key(
///         "recent_files",
///         Codec::new().with_decode(|raw| match raw {
///             Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
///             None => Ok(Some(Value::Array(Vec::new()))),
///         }),
///     );
/// ```
pub struct CodecConfig<V> {
    per_key: HashMap<String, Codec<V>>,
    default: Codec<V>,
}

impl<V> CodecConfig<V> {
    /// An empty configuration: every key uses the built-in JSON codec.
    pub fn new() -> Self {
        Self {
            per_key: HashMap::new(),
            default: Codec::new(),
        }
    }

    /// Override the codec for a single key. Replaces any earlier override for the same key.
    pub fn key(mut self, name: impl Into<String>, codec: Codec<V>) -> Self {
        self.per_key.insert(name.into(), codec);
        self
    }

    /// Override the codec for every key without a per-key override.
    pub fn default_codec(mut self, codec: Codec<V>) -> Self {
        self.default = codec;
        self
    }
}

impl<V> Default for CodecConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// The effective decode function for a key.
pub enum Decoder<'a, V> {
    /// A configured override, per-key or global.
    Custom(&'a DecodeFn<V>),
    /// The built-in JSON decode with fallback to the raw string.
    Default,
}

impl<V: SettingValue> Decoder<'_, V> {
    /// Decode a stored string, or its absence.
    pub fn decode(&self, raw: Option<&str>) -> Result<Option<V>, CodecError> {
        match self {
            Decoder::Custom(decode) => decode(raw),
            Decoder::Default => Ok(default_decode(raw)),
        }
    }
}

/// The effective encode function for a key.
pub enum Encoder<'a, V> {
    /// A configured override, per-key or global.
    Custom(&'a EncodeFn<V>),
    /// The built-in JSON encode.
    Default,
}

impl<V: SettingValue> Encoder<'_, V> {
    /// Encode a value for the host store.
    pub fn encode(&self, value: &V) -> Result<String, CodecError> {
        match self {
            Encoder::Custom(encode) => encode(value),
            Encoder::Default => default_encode(value),
        }
    }
}

/// Resolves the codec for each key: per-key override, then global override, then built-in.
/// Immutable once built.
pub struct CodecPolicy<V> {
    per_key: HashMap<String, Codec<V>>,
    global: Codec<V>,
}

impl<V> CodecPolicy<V> {
    /// Effective decode function for `key`.
    pub fn decoder(&self, key: &str) -> Decoder<'_, V> {
        self.per_key
            .get(key)
            .and_then(|codec| codec.decode.as_ref())
            .or(self.global.decode.as_ref())
            .map_or(Decoder::Default, Decoder::Custom)
    }

    /// Effective encode function for `key`.
    pub fn encoder(&self, key: &str) -> Encoder<'_, V> {
        self.per_key
            .get(key)
            .and_then(|codec| codec.encode.as_ref())
            .or(self.global.encode.as_ref())
            .map_or(Encoder::Default, Encoder::Custom)
    }

    /// Keys with a per-key decode override. These act as initializers for keys missing from the
    /// host store. The global override never initializes.
    pub fn initializer_keys(&self) -> impl Iterator<Item = &str> {
        self.per_key
            .iter()
            .filter(|(_, codec)| codec.decode.is_some())
            .map(|(key, _)| key.as_str())
    }
}

impl<V> From<CodecConfig<V>> for CodecPolicy<V> {
    fn from(config: CodecConfig<V>) -> Self {
        Self {
            per_key: config.per_key,
            global: config.default,
        }
    }
}
