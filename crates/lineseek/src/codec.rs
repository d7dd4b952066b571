//! Line codecs
//!
//! A codec turns one raw line of the sorted file into a typed key/value pair
//! and back. The search engine never looks inside a line except through this
//! trait, so any line layout works as long as keys decode in file order.

use crate::error::CodecError;
use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;

/// Default field separator.
pub const DEFAULT_SEPARATOR: &str = ":";

/// Converts raw lines to typed records and back.
pub trait LineCodec {
    /// Key type; file order must agree with `Ord`
    type Key: Ord + Clone + Debug;
    /// Value type
    type Value: Clone;

    /// Decode one line. The trailing newline may still be attached.
    fn decode(&self, line: &[u8]) -> Result<(Self::Key, Self::Value), CodecError>;

    /// Encode a record as a line without the trailing newline.
    fn encode(&self, key: &Self::Key, value: &Self::Value) -> String;
}

/// Codec for `<key><separator><value>` lines.
///
/// The line is split once on the separator, both halves are trimmed and then
/// parsed with [`FromStr`]. Encoding uses [`Display`].
///
/// # Examples
///
/// ```
/// use lineseek::{LineCodec, SeparatedCodec};
///
/// let codec = SeparatedCodec::<u32, String>::default();
/// let (key, value) = codec.decode(b"10: ten\n")?;
/// assert_eq!(key, 10);
/// assert_eq!(value, "ten");
/// assert_eq!(codec.encode(&key, &value), "10:ten");
/// # Ok::<(), lineseek::CodecError>(())
/// ```
pub struct SeparatedCodec<K, V> {
    separator: String,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> SeparatedCodec<K, V> {
    /// Create a codec splitting on `separator`.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            _types: PhantomData,
        }
    }

    /// Separator between key and value
    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl<K, V> Default for SeparatedCodec<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl<K, V> Clone for SeparatedCodec<K, V> {
    fn clone(&self) -> Self {
        Self::new(self.separator.clone())
    }
}

impl<K, V> Debug for SeparatedCodec<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeparatedCodec")
            .field("separator", &self.separator)
            .finish()
    }
}

impl<K, V> LineCodec for SeparatedCodec<K, V>
where
    K: FromStr + Display + Ord + Clone + Debug,
    K::Err: Display,
    V: FromStr + Display + Clone,
    V::Err: Display,
{
    type Key = K;
    type Value = V;

    fn decode(&self, line: &[u8]) -> Result<(K, V), CodecError> {
        let text = std::str::from_utf8(line).map_err(|_| CodecError::InvalidUtf8)?;
        let text = text.trim_end_matches(['\n', '\r']);

        let (raw_key, raw_value) =
            text.split_once(self.separator.as_str())
                .ok_or_else(|| CodecError::MissingSeparator {
                    separator: self.separator.clone(),
                    line: text.to_string(),
                })?;

        let raw_key = raw_key.trim();
        let key = raw_key.parse::<K>().map_err(|e| CodecError::InvalidKey {
            value: raw_key.to_string(),
            reason: e.to_string(),
        })?;

        let raw_value = raw_value.trim();
        let value = raw_value
            .parse::<V>()
            .map_err(|e| CodecError::InvalidValue {
                value: raw_value.to_string(),
                reason: e.to_string(),
            })?;

        Ok((key, value))
    }

    fn encode(&self, key: &K, value: &V) -> String {
        format!("{key}{}{value}", self.separator)
    }
}
