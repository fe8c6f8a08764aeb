//! Keys accepted by every collection.
//!
//! A [`Key`] is either an integer or a string. Nothing else can be stored as a
//! key: Rust types without an [`IntoKey`] implementation are rejected at compile
//! time, and dynamic inputs (`serde_json::Value`, `Option::None`, unsigned
//! integers above `i64::MAX`) are rejected at write time with
//! [`CollectionError::InvalidKey`].
//!
//! Lookups take a [`KeyRef`], a borrowed form that hashes exactly like the owned
//! key, so `map.get("name")` or `map.get(3)` never allocate.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::key::{Key, KeyMatch, KeyRef};
//!
//! let key = Key::from(1);
//! assert!(KeyRef::from(1).matches(&key, KeyMatch::Strict));
//! assert!(!KeyRef::from("1").matches(&key, KeyMatch::Strict));
//! assert!(KeyRef::from("1").matches(&key, KeyMatch::Loose));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::Equivalent;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CollectionError, Result};

const INT_TAG: u8 = 0;
const STR_TAG: u8 = 1;

// =============================================================================
// Key
// =============================================================================

/// An owned collection key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Key {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(String),
}

impl Key {
    /// Returns the borrowed form of this key.
    #[inline]
    #[must_use]
    pub fn as_key_ref(&self) -> KeyRef<'_> {
        match self {
            Self::Int(value) => KeyRef::Int(*value),
            Self::Str(value) => KeyRef::Str(value),
        }
    }

    /// Returns the integer if this is an integer key.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Returns the string if this is a string key.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(value) => Some(value),
        }
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_key_ref().hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_key_ref().fmt(formatter)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<KeyRef<'_>> for Key {
    fn from(value: KeyRef<'_>) -> Self {
        match value {
            KeyRef::Int(value) => Self::Int(value),
            KeyRef::Str(value) => Self::Str(value.to_owned()),
        }
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Str(value) => serializer.serialize_str(value),
        }
    }
}

struct KeyVisitor;

impl serde::de::Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a string")
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Key, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::Int(value))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Key, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(value)
            .map(Key::Int)
            .map_err(|_| E::custom(format!("integer key {value} exceeds i64::MAX")))
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Key, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::Str(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> std::result::Result<Key, E>
    where
        E: serde::de::Error,
    {
        Ok(Key::Str(value))
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}

// =============================================================================
// KeyRef
// =============================================================================

/// A borrowed collection key used for lookups and key matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRef<'a> {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(&'a str),
}

impl KeyRef<'_> {
    /// Compares this key against a stored key.
    ///
    /// [`KeyMatch::Strict`] requires the same type and value. [`KeyMatch::Loose`]
    /// compares an integer with a numeric string numerically, two numeric strings
    /// numerically, and everything else as strings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_cursor::key::{Key, KeyMatch, KeyRef};
    ///
    /// assert!(KeyRef::from("01").matches(&Key::from(1), KeyMatch::Loose));
    /// assert!(KeyRef::from("1e1").matches(&Key::from("10"), KeyMatch::Loose));
    /// assert!(!KeyRef::from("abc").matches(&Key::from(0), KeyMatch::Loose));
    /// ```
    #[must_use]
    pub fn matches(&self, key: &Key, mode: KeyMatch) -> bool {
        let other = key.as_key_ref();
        match mode {
            KeyMatch::Strict => *self == other,
            KeyMatch::Loose => loosely_equal(*self, other),
        }
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Int(value) => {
                state.write_u8(INT_TAG);
                value.hash(state);
            }
            Self::Str(value) => {
                state.write_u8(STR_TAG);
                value.hash(state);
            }
        }
    }
}

impl Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        *self == key.as_key_ref()
    }
}

impl fmt::Display for KeyRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for KeyRef<'_> {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for KeyRef<'_> {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for KeyRef<'_> {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for KeyRef<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a Key> for KeyRef<'a> {
    fn from(value: &'a Key) -> Self {
        value.as_key_ref()
    }
}

// =============================================================================
// KeyMatch
// =============================================================================

/// Comparison mode for key searches such as `seek_to_key` and `slice_by_key`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyMatch {
    /// Same type and same value.
    #[default]
    Strict,
    /// Value comparison with integer/numeric-string coercion.
    Loose,
}

/// A numeric string as a loose comparison sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Parses `text`, keeping integer-shaped input exact.
    ///
    /// Surrounding whitespace is allowed; `inf`, `nan` and friends are not numeric.
    /// Integers outside the `i64` range fall back to floats.
    fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty()
            || !trimmed
                .bytes()
                .all(|byte| byte.is_ascii_digit() || matches!(byte, b'+' | b'-' | b'.' | b'e' | b'E'))
        {
            return None;
        }
        trimmed
            .parse::<i64>()
            .map(Self::Int)
            .or_else(|_| trimmed.parse::<f64>().map(Self::Float))
            .ok()
    }

    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn equals(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Int(int), Self::Float(float)) | (Self::Float(float), Self::Int(int)) => {
                int as f64 == float
            }
            (Self::Float(left), Self::Float(right)) => left == right,
        }
    }
}

fn loosely_equal(left: KeyRef<'_>, right: KeyRef<'_>) -> bool {
    match (left, right) {
        (KeyRef::Int(left), KeyRef::Int(right)) => left == right,
        (KeyRef::Str(left), KeyRef::Str(right)) => match (Numeric::parse(left), Numeric::parse(right)) {
            (Some(left), Some(right)) => left.equals(right),
            _ => left == right,
        },
        (KeyRef::Int(number), KeyRef::Str(text)) | (KeyRef::Str(text), KeyRef::Int(number)) => {
            Numeric::parse(text).map_or_else(
                || number.to_string() == text,
                |parsed| Numeric::Int(number).equals(parsed),
            )
        }
    }
}

// =============================================================================
// IntoKey
// =============================================================================

/// Fallible conversion used on every write path.
///
/// Implemented for integers, strings, [`Key`], `Option<K>` (where `None` is a
/// null key) and `serde_json::Value` (only integers and strings are accepted).
pub trait IntoKey {
    /// Converts `self` into a [`Key`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidKey`] when the input is not an integer
    /// or a string.
    fn into_key(self) -> Result<Key>;
}

impl IntoKey for Key {
    fn into_key(self) -> Result<Key> {
        Ok(self)
    }
}

impl IntoKey for &Key {
    fn into_key(self) -> Result<Key> {
        Ok(self.clone())
    }
}

impl IntoKey for KeyRef<'_> {
    fn into_key(self) -> Result<Key> {
        Ok(Key::from(self))
    }
}

impl IntoKey for &str {
    fn into_key(self) -> Result<Key> {
        Ok(Key::from(self))
    }
}

impl IntoKey for String {
    fn into_key(self) -> Result<Key> {
        Ok(Key::Str(self))
    }
}

impl IntoKey for &String {
    fn into_key(self) -> Result<Key> {
        Ok(Key::Str(self.clone()))
    }
}

macro_rules! impl_into_key_lossless {
    ($($integer:ty),*) => {
        $(
            impl IntoKey for $integer {
                fn into_key(self) -> Result<Key> {
                    Ok(Key::Int(i64::from(self)))
                }
            }
        )*
    };
}

impl_into_key_lossless!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_into_key_checked {
    ($($integer:ty),*) => {
        $(
            impl IntoKey for $integer {
                fn into_key(self) -> Result<Key> {
                    i64::try_from(self)
                        .map(Key::Int)
                        .map_err(|_| CollectionError::invalid_key(concat!("out-of-range ", stringify!($integer))))
                }
            }
        )*
    };
}

impl_into_key_checked!(u64, usize, isize, i128, u128);

impl<K: IntoKey> IntoKey for Option<K> {
    fn into_key(self) -> Result<Key> {
        self.map_or_else(|| Err(CollectionError::invalid_key("null")), IntoKey::into_key)
    }
}

impl IntoKey for serde_json::Value {
    fn into_key(self) -> Result<Key> {
        match self {
            Self::String(text) => Ok(Key::Str(text)),
            other => (&other).into_key(),
        }
    }
}

impl IntoKey for &serde_json::Value {
    fn into_key(self) -> Result<Key> {
        use serde_json::Value;

        match self {
            Value::Number(number) => number
                .as_i64()
                .map(Key::Int)
                .ok_or_else(|| CollectionError::invalid_key("float")),
            Value::String(text) => Ok(Key::Str(text.clone())),
            Value::Null => Err(CollectionError::invalid_key("null")),
            Value::Bool(_) => Err(CollectionError::invalid_key("bool")),
            Value::Array(_) => Err(CollectionError::invalid_key("array")),
            Value::Object(_) => Err(CollectionError::invalid_key("object")),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
