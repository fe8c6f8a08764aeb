//! Cursor protocol shared by every collection.
//!
//! Each collection owns exactly one cursor. The cursor is a [`Position`]: the
//! lazy start of the sequence, an existing key, or detached (ran off either end,
//! its key was removed, or a seek failed). The [`Seekable`] trait layers the
//! classic stateful protocol (`rewind`, `next`, `prev`, `seek`, ...) on top of
//! it and also exposes the cursor-independent read API (`get`, `iter`, ...).
//!
//! Advancing returns a tagged [`Fetched`] value internally. [`Seekable::next`]
//! and [`Seekable::prev`] project it to an `Option`, while
//! [`Seekable::sc_next`] and [`Seekable::sc_prev`] return it unchanged so a
//! consumer can tell "the next value is `null`/`false`/`0`" apart from "the
//! cursor left the sequence" ([`Fetched::NotSet`]).
//!
//! # Nested traversal
//!
//! The stateful cursor is per-instance: walking the same collection with
//! `next()` from inside a `next()` loop moves the outer walk too. Use
//! [`Seekable::iter`] for nested or concurrent reads.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//! use serde_json::{json, Value};
//!
//! let mut list: ListCollection<Value> =
//!     vec![json!(1), json!(false), json!(null)].into_iter().collect();
//!
//! assert_eq!(list.rewind(), Some(&json!(1)));
//! assert_eq!(list.sc_next(), Fetched::Value(&json!(false)));
//! assert_eq!(list.sc_next(), Fetched::Value(&json!(null)));
//! assert_eq!(list.sc_next(), Fetched::NotSet);
//! assert!(!list.valid());
//! ```

use crate::error::Result;
use crate::key::{Key, KeyMatch, KeyRef};
use crate::ordered_map::{Iter, Keys, OrderedMap, Values};

// =============================================================================
// Position
// =============================================================================

/// Where a collection's cursor currently points.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Position {
    /// Before any movement; reads resolve to the first pair, if there is one.
    #[default]
    Start,
    /// On an existing key.
    At(Key),
    /// Off the sequence. Only `rewind`, `to_end` and seeks bring it back.
    Detached,
}

// =============================================================================
// Fetched
// =============================================================================

/// Result of a sentinel-aware cursor move.
///
/// `NotSet` is the "moved past the available pairs" sentinel; it is a separate
/// variant, so no stored value can ever be mistaken for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fetched<T> {
    /// The cursor landed on a pair holding this value.
    Value(T),
    /// The cursor left the sequence.
    NotSet,
}

impl<T> Fetched<T> {
    /// Returns `true` for [`Fetched::NotSet`].
    #[inline]
    #[must_use]
    pub const fn is_not_set(&self) -> bool {
        matches!(self, Self::NotSet)
    }

    /// Converts into an `Option`, mapping `NotSet` to `None`.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::NotSet => None,
        }
    }

    /// Maps the fetched value.
    #[inline]
    pub fn map<U, F>(self, function: F) -> Fetched<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Value(value) => Fetched::Value(function(value)),
            Self::NotSet => Fetched::NotSet,
        }
    }
}

impl<T> From<Option<T>> for Fetched<T> {
    fn from(option: Option<T>) -> Self {
        option.map_or(Self::NotSet, Self::Value)
    }
}

impl<T> From<Fetched<T>> for Option<T> {
    fn from(fetched: Fetched<T>) -> Self {
        fetched.value()
    }
}

// =============================================================================
// Slots
// =============================================================================

/// Mutable handle a collection lends to the [`Seekable`] default methods.
///
/// It can move the cursor and rewrite values in place, but it can never add,
/// remove or re-key pairs, so lending it out cannot break a collection's key
/// invariants (dense list keys, entity-derived keys).
pub struct Slots<'a, V> {
    map: &'a mut OrderedMap<V>,
}

impl<'a, V> Slots<'a, V> {
    /// Wraps an ordered map.
    #[inline]
    pub const fn new(map: &'a mut OrderedMap<V>) -> Self {
        Self { map }
    }

    /// Moves to the first pair.
    pub fn rewind(self) -> Option<&'a V> {
        self.map.cursor_rewind()
    }

    /// Moves to the last pair.
    pub fn to_end(self) -> Option<&'a V> {
        self.map.cursor_to_end()
    }

    /// Moves one pair forward.
    pub fn advance(self) -> Fetched<&'a V> {
        self.map.cursor_advance()
    }

    /// Moves one pair backward.
    pub fn retreat(self) -> Fetched<&'a V> {
        self.map.cursor_retreat()
    }

    /// Moves to a zero-based position.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` when `position` is past the last pair.
    pub fn seek(self, position: usize) -> Result<&'a V> {
        self.map.cursor_seek(position)
    }

    /// Moves to the first key matching `target`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` when no key matches.
    pub fn seek_to_key(self, target: KeyRef<'_>, mode: KeyMatch) -> Result<&'a V> {
        self.map.cursor_seek_key(target, mode)
    }

    /// Replaces every value with `transform(value, key)`, keeping keys and order.
    pub fn rewrite_values<F>(self, transform: F)
    where
        F: FnMut(&V, &Key) -> V,
    {
        self.map.rewrite_values(transform);
    }
}

// =============================================================================
// Seekable
// =============================================================================

/// Read access and the stateful cursor protocol.
///
/// Implementors supply the backing [`OrderedMap`] and a [`Slots`] handle; every
/// other method has a default.
pub trait Seekable {
    /// The stored value type.
    type Value;

    /// Returns the backing ordered map.
    fn ordered_map(&self) -> &OrderedMap<Self::Value>;

    /// Lends the cursor/value handle.
    fn slots(&mut self) -> Slots<'_, Self::Value>;

    // -------------------------------------------------------------------------
    // Read API
    // -------------------------------------------------------------------------

    /// Returns the value stored under `key`.
    fn get<'k>(&self, key: impl Into<KeyRef<'k>>) -> Option<&Self::Value> {
        self.ordered_map().lookup(key.into())
    }

    /// Returns the value stored under `key`, or `default` when absent.
    fn get_or<'a, 'k>(&'a self, key: impl Into<KeyRef<'k>>, default: &'a Self::Value) -> &'a Self::Value {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if `key` is present.
    fn has<'k>(&self, key: impl Into<KeyRef<'k>>) -> bool {
        self.ordered_map().contains_key(key.into())
    }

    /// Number of pairs.
    fn count(&self) -> usize {
        self.ordered_map().len()
    }

    /// Returns `true` if there are no pairs.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Keys in iteration order.
    fn keys(&self) -> Keys<'_, Self::Value> {
        self.ordered_map().key_iter()
    }

    /// Values in iteration order.
    fn values(&self) -> Values<'_, Self::Value> {
        self.ordered_map().value_iter()
    }

    /// Pairs in iteration order. Independent of the cursor.
    fn iter(&self) -> Iter<'_, Self::Value> {
        self.ordered_map().pair_iter()
    }

    /// Clones every pair, in order.
    fn get_all(&self) -> Vec<(Key, Self::Value)>
    where
        Self::Value: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Cursor protocol
    // -------------------------------------------------------------------------

    /// The raw cursor position.
    fn position(&self) -> &Position {
        self.ordered_map().cursor_position()
    }

    /// Moves to the first pair and returns its value; `None` when empty.
    fn rewind(&mut self) -> Option<&Self::Value> {
        self.slots().rewind()
    }

    /// Moves to the last pair and returns its value; `None` when empty.
    fn to_end(&mut self) -> Option<&Self::Value> {
        self.slots().to_end()
    }

    /// Moves forward; `None` once the cursor leaves the sequence.
    fn next(&mut self) -> Option<&Self::Value> {
        self.slots().advance().value()
    }

    /// Moves backward; `None` once the cursor leaves the sequence.
    fn prev(&mut self) -> Option<&Self::Value> {
        self.slots().retreat().value()
    }

    /// Moves forward, reporting [`Fetched::NotSet`] once the cursor leaves the
    /// sequence.
    fn sc_next(&mut self) -> Fetched<&Self::Value> {
        self.slots().advance()
    }

    /// Moves backward, reporting [`Fetched::NotSet`] once the cursor leaves the
    /// sequence.
    fn sc_prev(&mut self) -> Fetched<&Self::Value> {
        self.slots().retreat()
    }

    /// Value under the cursor.
    fn current(&self) -> Option<&Self::Value> {
        self.ordered_map().cursor_entry().map(|(_, value)| value)
    }

    /// Key under the cursor.
    fn key(&self) -> Option<&Key> {
        self.ordered_map().cursor_entry().map(|(key, _)| key)
    }

    /// Returns `true` while the cursor is on a pair.
    fn valid(&self) -> bool {
        self.ordered_map().cursor_entry().is_some()
    }

    /// Moves to a zero-based position and returns its value.
    ///
    /// `seek(0)` is `rewind()` followed by a read.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::Position` when `position >= count()`. The cursor is
    /// detached afterwards.
    fn seek(&mut self, position: usize) -> Result<&Self::Value> {
        self.slots().seek(position)
    }

    /// Moves to the first key matching `key` under `mode` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::Key` when nothing matches. The cursor is detached
    /// afterwards.
    fn seek_to_key<'k>(&mut self, key: impl Into<KeyRef<'k>>, mode: KeyMatch) -> Result<&Self::Value> {
        self.slots().seek_to_key(key.into(), mode)
    }
}
