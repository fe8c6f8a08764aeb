//! Deriving new collections from existing ones.
//!
//! [`Sliceable`] adds key-based slicing, filtering, containment search and
//! in-place value rewriting to every [`Seekable`] collection.
//!
//! # Copy or mutate
//!
//! - `filter` and `slice_by_key` return a new collection of the same concrete
//!   type and leave the source (including its cursor) untouched.
//! - `for_all` rewrites values in place and returns the collection for chaining.
//!   Keys and the cursor are untouched.
//! - `contains` only reads.
//!
//! New collections are built with [`Sliceable::from_pairs`], so each variant
//! applies its own key rules: maps keep the keys, lists re-derive `0..n-1`,
//! entity maps re-derive keys from their entities.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//!
//! let map: OrderedMap<i32> = [("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]
//!     .into_iter()
//!     .map(|(key, value)| (Key::from(key), value))
//!     .collect();
//!
//! let slice = map.slice_by_key("b", KeyMatch::Loose, 2);
//! assert_eq!(slice.get_all(), vec![(Key::from("b"), 2), (Key::from("c"), 3)]);
//!
//! let even = map.filter(|value, _| value % 2 == 0);
//! assert_eq!(even.count(), 2);
//! assert_eq!(map.count(), 5);
//! ```

use crate::cursor::Seekable;
use crate::key::{Key, KeyMatch, KeyRef};

/// Slicing, filtering and bulk transformation.
pub trait Sliceable: Seekable + Sized {
    /// Builds a collection of this concrete type from ordered pairs.
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, Self::Value)>;

    /// Returns the pairs for which `predicate(value, key)` holds, in order.
    fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Self::Value, &Key) -> bool,
        Self::Value: Clone,
    {
        Self::from_pairs(
            self.iter()
                .filter(|(key, value)| predicate(value, key))
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }

    /// Replaces every value with `transform(value, key)` in place.
    fn for_all<F>(&mut self, transform: F) -> &mut Self
    where
        F: FnMut(&Self::Value, &Key) -> Self::Value,
    {
        self.slots().rewrite_values(transform);
        self
    }

    /// Returns up to `length` consecutive pairs starting at the first key
    /// matching `start`.
    ///
    /// A missing start key or a zero `length` gives an empty collection.
    fn slice_by_key<'k>(&self, start: impl Into<KeyRef<'k>>, mode: KeyMatch, length: usize) -> Self
    where
        Self::Value: Clone,
    {
        if length == 0 {
            return Self::from_pairs(std::iter::empty());
        }
        let start = start.into();
        let Some(index) = self.ordered_map().locate(start, mode) else {
            tracing::debug!(key = %start, ?mode, "slice start key not found");
            return Self::from_pairs(std::iter::empty());
        };
        Self::from_pairs(
            self.ordered_map()
                .pairs_from(index, length)
                .map(|(key, value)| (key.clone(), value.clone())),
        )
    }

    /// Returns every pair from the first key matching `start` to the end.
    fn slice_from_key<'k>(&self, start: impl Into<KeyRef<'k>>, mode: KeyMatch) -> Self
    where
        Self::Value: Clone,
    {
        self.slice_by_key(start, mode, usize::MAX)
    }

    /// Returns `true` as soon as one pair satisfies `predicate(value, key)`.
    fn contains<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&Self::Value, &Key) -> bool,
    {
        self.iter().any(|(key, value)| predicate(value, key))
    }
}
