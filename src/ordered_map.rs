//! Insertion-ordered key/value store with an internal cursor.
//!
//! This module provides [`OrderedMap`], the map-like collection and the backing
//! store of every other collection in the crate.
//!
//! # Overview
//!
//! - Keys are [`Key`]s (integers or strings) and are unique.
//! - Iteration follows insertion order; overwriting a key keeps its position.
//! - Each map owns one cursor (see [`crate::cursor`]).
//! - Cloning deep-copies the pair sequence; clones never alias.
//!
//! | Operation      | Complexity |
//! |----------------|------------|
//! | `get` / `has`  | O(1)       |
//! | `set`          | O(1)*      |
//! | `remove`       | O(n)       |
//! | `seek`         | O(1)       |
//! | `seek_to_key`  | O(1) strict, O(n) loose |
//! | `reset_keys`   | O(n)       |
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//!
//! let mut map = OrderedMap::new();
//! map.set("b", 2).unwrap().set("a", 1).unwrap().set("b", 20).unwrap();
//!
//! let keys: Vec<&Key> = map.keys().collect();
//! assert_eq!(keys, vec![&Key::from("b"), &Key::from("a")]);
//! assert_eq!(map.get("b"), Some(&20));
//!
//! map.reset_keys();
//! assert_eq!(map.get(0), Some(&20));
//! assert_eq!(map.get(1), Some(&1));
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cursor::{Fetched, Position, Seekable, Slots};
use crate::error::{OutOfBounds, Result};
use crate::key::{IntoKey, Key, KeyMatch, KeyRef};
use crate::slice::Sliceable;
use crate::structured::{Structured, to_structured_value};

#[cfg(feature = "fxhash")]
type Hasher = rustc_hash::FxBuildHasher;

#[cfg(not(feature = "fxhash"))]
type Hasher = std::hash::RandomState;

type Entries<V> = indexmap::IndexMap<Key, V, Hasher>;

/// Key for the pair at a zero-based position in a dense sequence.
#[allow(clippy::cast_possible_wrap)]
pub(crate) const fn index_key(index: usize) -> Key {
    Key::Int(index as i64)
}

// =============================================================================
// OrderedMap
// =============================================================================

/// An insertion-ordered map from [`Key`] to `V` with an internal cursor.
///
/// Equality compares the pairs in order and ignores the cursor.
#[derive(Clone)]
pub struct OrderedMap<V> {
    entries: Entries<V>,
    position: Position,
}

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Entries::default(),
            position: Position::Start,
        }
    }

    /// Creates an empty map with room for `capacity` pairs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Entries::with_capacity_and_hasher(capacity, Hasher::default()),
            position: Position::Start,
        }
    }

    /// Stores `value` under `key`.
    ///
    /// A new key is appended; an existing key keeps its position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` when `key` is not an integer or a string. The map is
    /// unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_cursor::prelude::*;
    /// use serde_json::json;
    ///
    /// let mut map = OrderedMap::new();
    /// assert!(map.set(json!(true), 1).unwrap_err().is_invalid_key());
    /// assert!(map.is_empty());
    /// ```
    pub fn set(&mut self, key: impl IntoKey, value: V) -> Result<&mut Self> {
        let key = key.into_key()?;
        self.entries.insert(key, value);
        Ok(self)
    }

    /// Stores `value` under an already validated key and returns the previous
    /// value.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    ///
    /// If the cursor was on the removed key it is detached; otherwise it stays
    /// where it was.
    pub fn remove<'k>(&mut self, key: impl Into<KeyRef<'k>>) -> Option<V> {
        let key: KeyRef<'_> = key.into();
        let cursor = self.cursor_index();
        let (index, _, removed) = self.entries.shift_remove_full(&key)?;
        if cursor == Some(index) {
            self.position = Position::Detached;
        }
        Some(removed)
    }

    /// Removes every pair and resets the cursor.
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.position = Position::Start;
        self
    }

    /// Re-derives the keys as `0..n-1` in the current order.
    ///
    /// The cursor stays on the same pair.
    pub fn reset_keys(&mut self) -> &mut Self {
        let index = self.cursor_index();
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_values()
            .enumerate()
            .map(|(index, value)| (index_key(index), value))
            .collect();
        if let Position::At(_) = self.position {
            self.position = index.map_or(Position::Detached, |index| Position::At(index_key(index)));
        }
        self
    }

    /// Replaces every pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if any key is rejected; the map is unchanged in that
    /// case.
    pub fn set_all<K, I>(&mut self, pairs: I) -> Result<&mut Self>
    where
        K: IntoKey,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| key.into_key().map(|key| (key, value)))
            .collect::<Result<Entries<V>>>()?;
        self.entries = entries;
        self.position = Position::Start;
        Ok(self)
    }

    /// Consumes the map and returns its pairs in order.
    pub fn into_pairs(self) -> Vec<(Key, V)> {
        self.entries.into_iter().collect()
    }

    /// Number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the map into a JSON object, keys rendered as strings.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a value cannot be represented as JSON.
    pub fn to_structured(&self) -> Result<Structured>
    where
        V: Serialize,
    {
        to_structured_value(self)
    }

    // -------------------------------------------------------------------------
    // Read primitives
    // -------------------------------------------------------------------------

    pub(crate) fn lookup(&self, key: KeyRef<'_>) -> Option<&V> {
        self.entries.get(&key)
    }

    pub(crate) fn contains_key(&self, key: KeyRef<'_>) -> bool {
        self.entries.contains_key(&key)
    }

    pub(crate) fn pair_iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub(crate) fn key_iter(&self) -> Keys<'_, V> {
        Keys {
            inner: self.entries.keys(),
        }
    }

    pub(crate) fn value_iter(&self) -> Values<'_, V> {
        Values {
            inner: self.entries.values(),
        }
    }

    /// Index of the first key matching `target`.
    pub(crate) fn locate(&self, target: KeyRef<'_>, mode: KeyMatch) -> Option<usize> {
        match mode {
            KeyMatch::Strict => self.entries.get_index_of(&target),
            KeyMatch::Loose => self.entries.keys().position(|key| target.matches(key, mode)),
        }
    }

    /// Pairs from `start` on, at most `length` of them.
    pub(crate) fn pairs_from(&self, start: usize, length: usize) -> impl Iterator<Item = (&Key, &V)> {
        self.entries.iter().skip(start).take(length)
    }

    pub(crate) fn rewrite_values<F>(&mut self, mut transform: F)
    where
        F: FnMut(&V, &Key) -> V,
    {
        for (key, value) in &mut self.entries {
            let rewritten = transform(value, key);
            *value = rewritten;
        }
    }

    // -------------------------------------------------------------------------
    // Cursor primitives
    // -------------------------------------------------------------------------

    pub(crate) const fn cursor_position(&self) -> &Position {
        &self.position
    }

    fn cursor_index(&self) -> Option<usize> {
        match &self.position {
            Position::Start if !self.entries.is_empty() => Some(0),
            Position::Start | Position::Detached => None,
            Position::At(key) => self.entries.get_index_of(key),
        }
    }

    pub(crate) fn cursor_entry(&self) -> Option<(&Key, &V)> {
        self.cursor_index()
            .and_then(|index| self.entries.get_index(index))
    }

    /// Points the cursor at `index`, detaching it when there is no such pair.
    fn place_cursor(&mut self, index: usize) -> Option<&V> {
        match self.entries.get_index(index) {
            Some((key, _)) => {
                self.position = Position::At(key.clone());
                self.entries.get_index(index).map(|(_, value)| value)
            }
            None => {
                self.position = Position::Detached;
                None
            }
        }
    }

    pub(crate) fn cursor_rewind(&mut self) -> Option<&V> {
        if self.entries.is_empty() {
            self.position = Position::Start;
            return None;
        }
        self.place_cursor(0)
    }

    pub(crate) fn cursor_to_end(&mut self) -> Option<&V> {
        match self.entries.len().checked_sub(1) {
            Some(last) => self.place_cursor(last),
            None => {
                self.position = Position::Start;
                None
            }
        }
    }

    pub(crate) fn cursor_advance(&mut self) -> Fetched<&V> {
        match self.cursor_index() {
            Some(index) => self.place_cursor(index + 1).into(),
            None => Fetched::NotSet,
        }
    }

    pub(crate) fn cursor_retreat(&mut self) -> Fetched<&V> {
        match self.cursor_index() {
            Some(0) => {
                self.position = Position::Detached;
                Fetched::NotSet
            }
            Some(index) => self.place_cursor(index - 1).into(),
            None => Fetched::NotSet,
        }
    }

    pub(crate) fn cursor_seek(&mut self, position: usize) -> Result<&V> {
        let count = self.entries.len();
        if position >= count {
            tracing::trace!(position, count, "seek past the last pair");
            self.position = Position::Detached;
            return Err(OutOfBounds::Position { position, count }.into());
        }
        self.place_cursor(position)
            .ok_or_else(|| OutOfBounds::Position { position, count }.into())
    }

    pub(crate) fn cursor_seek_key(&mut self, target: KeyRef<'_>, mode: KeyMatch) -> Result<&V> {
        match self.locate(target, mode) {
            Some(index) => self.place_cursor(index).ok_or_else(|| {
                OutOfBounds::Key {
                    key: Key::from(target),
                }
                .into()
            }),
            None => {
                tracing::trace!(key = %target, ?mode, "no key matched");
                self.position = Position::Detached;
                Err(OutOfBounds::Key {
                    key: Key::from(target),
                }
                .into())
            }
        }
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<V: fmt::Debug> fmt::Debug for OrderedMap<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<V> Seekable for OrderedMap<V> {
    type Value = V;

    fn ordered_map(&self) -> &OrderedMap<V> {
        self
    }

    fn slots(&mut self) -> Slots<'_, V> {
        Slots::new(self)
    }
}

impl<V> Sliceable for OrderedMap<V> {
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        pairs.into_iter().collect()
    }
}

impl<V> FromIterator<(Key, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            position: Position::Start,
        }
    }
}

impl<V> Extend<(Key, V)> for OrderedMap<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<V> Index<&Key> for OrderedMap<V> {
    type Output = V;

    fn index(&self, key: &Key) -> &V {
        self.lookup(key.as_key_ref())
            .unwrap_or_else(|| panic!("key {key} not found in OrderedMap"))
    }
}

impl<V> Index<&str> for OrderedMap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &V {
        self.lookup(KeyRef::Str(key))
            .unwrap_or_else(|| panic!("key {key} not found in OrderedMap"))
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (Key, V);
    type IntoIter = indexmap::map::IntoIter<Key, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.pair_iter()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over `(key, value)` pairs in order.
#[derive(Clone)]
pub struct Iter<'a, V> {
    inner: indexmap::map::Iter<'a, Key, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a Key, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// Borrowing iterator over keys in order.
#[derive(Clone)]
pub struct Keys<'a, V> {
    inner: indexmap::map::Keys<'a, Key, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Keys<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// Borrowing iterator over values in order.
#[derive(Clone)]
pub struct Values<'a, V> {
    inner: indexmap::map::Values<'a, Key, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> DoubleEndedIterator for Values<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

// =============================================================================
// Serde
// =============================================================================

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V> {
    marker: std::marker::PhantomData<V>,
}

impl<V> OrderedMapVisitor<V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

impl<'de, V> Visitor<'de> for OrderedMapVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with integer or string keys")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = access.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut map = OrderedMap::with_capacity(capacity);
        while let Some((key, value)) = access.next_entry::<Key, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, V> Deserialize<'de> for OrderedMap<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn letters() -> OrderedMap<i32> {
        [("a", 1), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(key, value)| (Key::from(key), value))
            .collect()
    }

    #[rstest]
    fn test_new_is_empty() {
        let map: OrderedMap<i32> = OrderedMap::new();
        assert!(map.is_empty());
        assert!(!map.valid());
        assert_eq!(map.current(), None);
        assert_eq!(map.key(), None);
    }

    #[rstest]
    fn test_set_then_get(mut letters: OrderedMap<i32>) {
        letters.set("d", 4).unwrap();
        assert_eq!(letters.get("d"), Some(&4));
        assert!(letters.has("d"));
        assert_eq!(letters.count(), 4);
    }

    #[rstest]
    fn test_overwrite_keeps_position(mut letters: OrderedMap<i32>) {
        letters.set("a", 10).unwrap();
        let keys: Vec<Key> = letters.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b"), Key::from("c")]);
        assert_eq!(letters.get("a"), Some(&10));
    }

    #[rstest]
    fn test_get_or_falls_back(letters: OrderedMap<i32>) {
        assert_eq!(*letters.get_or("z", &0), 0);
        assert_eq!(*letters.get_or("b", &0), 2);
    }

    #[rstest]
    fn test_invalid_key_leaves_map_untouched(mut letters: OrderedMap<i32>) {
        let before = letters.clone();
        let error = letters.set(json!(1.5), 9).unwrap_err();
        assert!(error.is_invalid_key());
        assert_eq!(letters, before);
    }

    #[rstest]
    fn test_set_all_rejects_before_replacing(mut letters: OrderedMap<i32>) {
        let before = letters.clone();
        let result = letters.set_all(vec![(json!("x"), 1), (json!(null), 2)]);
        assert!(result.is_err());
        assert_eq!(letters, before);
    }

    #[rstest]
    fn test_remove_absent_is_noop(mut letters: OrderedMap<i32>) {
        assert_eq!(letters.remove("z"), None);
        assert_eq!(letters.count(), 3);
    }

    #[rstest]
    fn test_remove_under_cursor_detaches(mut letters: OrderedMap<i32>) {
        letters.seek_to_key("b", KeyMatch::Strict).unwrap();
        assert_eq!(letters.remove("b"), Some(2));
        assert!(!letters.valid());
        assert_eq!(letters.next(), None);
        assert_eq!(letters.rewind(), Some(&1));
    }

    #[rstest]
    fn test_remove_first_pair_of_unmoved_cursor_detaches(mut letters: OrderedMap<i32>) {
        assert_eq!(letters.key(), Some(&Key::from("a")));
        assert_eq!(letters.remove("a"), Some(1));
        assert!(!letters.valid());
        assert_eq!(letters.key(), None);
        assert_eq!(letters.rewind(), Some(&2));
    }

    #[rstest]
    fn test_remove_other_pair_of_unmoved_cursor_keeps_it(mut letters: OrderedMap<i32>) {
        letters.remove("b");
        assert_eq!(letters.key(), Some(&Key::from("a")));
        assert_eq!(letters.sc_next(), Fetched::Value(&3));
    }

    #[rstest]
    fn test_remove_elsewhere_keeps_cursor(mut letters: OrderedMap<i32>) {
        letters.seek_to_key("c", KeyMatch::Strict).unwrap();
        letters.remove("a");
        assert_eq!(letters.key(), Some(&Key::from("c")));
        assert_eq!(letters.prev(), Some(&2));
    }

    #[rstest]
    fn test_clear_resets(mut letters: OrderedMap<i32>) {
        letters.to_end();
        letters.clear();
        assert_eq!(letters.count(), 0);
        assert!(!letters.valid());
        letters.set("fresh", 1).unwrap();
        assert_eq!(letters.current(), Some(&1));
    }

    #[rstest]
    fn test_reset_keys_keeps_value_order(mut letters: OrderedMap<i32>) {
        letters.reset_keys();
        let pairs: Vec<(Key, i32)> = letters.get_all();
        assert_eq!(
            pairs,
            vec![(Key::from(0), 1), (Key::from(1), 2), (Key::from(2), 3)]
        );
    }

    #[rstest]
    fn test_reset_keys_keeps_cursor_on_pair(mut letters: OrderedMap<i32>) {
        letters.seek(1).unwrap();
        letters.reset_keys();
        assert_eq!(letters.key(), Some(&Key::from(1)));
        assert_eq!(letters.current(), Some(&2));
    }

    #[rstest]
    fn test_equality_is_order_sensitive() {
        let forward: OrderedMap<i32> = vec![(Key::from("a"), 1), (Key::from("b"), 2)]
            .into_iter()
            .collect();
        let backward: OrderedMap<i32> = vec![(Key::from("b"), 2), (Key::from("a"), 1)]
            .into_iter()
            .collect();
        assert_ne!(forward, backward);
    }

    #[rstest]
    fn test_clone_does_not_alias(letters: OrderedMap<i32>) {
        let mut copy = letters.clone();
        copy.set("a", 100).unwrap();
        assert_eq!(letters.get("a"), Some(&1));
    }

    #[rstest]
    fn test_index(letters: OrderedMap<i32>) {
        assert_eq!(letters["b"], 2);
        assert_eq!(letters[&Key::from("c")], 3);
    }

    #[rstest]
    fn test_serde_preserves_order_and_key_types() {
        let mut map = OrderedMap::new();
        map.set("leet", 1337).unwrap().set(4, 7).unwrap();
        let encoded = serde_json::to_string(&map).unwrap();
        assert_eq!(encoded, r#"{"leet":1337,"4":7}"#);

        let decoded: OrderedMap<i32> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.get("4"), Some(&7));
    }

    #[rstest]
    fn test_to_structured(letters: OrderedMap<i32>) {
        assert_eq!(
            letters.to_structured().unwrap(),
            json!({"a": 1, "b": 2, "c": 3})
        );
    }
}
