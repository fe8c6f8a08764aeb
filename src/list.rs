//! Dense, zero-based list collection.
//!
//! [`ListCollection`] is an [`OrderedMap`] whose keys are always the integers
//! `0..n-1`. Construction, bulk replacement, appending and removal all
//! re-derive the keys, so derived collections (filters, slices, pages) come
//! back dense as well.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//!
//! let mut list: ListCollection<&str> = ["x", "y"].into_iter().collect();
//! list.add("z");
//! list.remove(0);
//!
//! assert_eq!(list.get(0), Some(&"y"));
//! assert_eq!(list.get(1), Some(&"z"));
//! assert_eq!(list.count(), 2);
//! ```

use std::ops::Index;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cursor::{Seekable, Slots};
use crate::error::{OutOfBounds, Result};
use crate::key::Key;
use crate::ordered_map::{OrderedMap, index_key};
use crate::slice::Sliceable;
use crate::structured::{Structured, to_structured_value};

/// A list of values keyed `0..n-1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListCollection<V> {
    map: OrderedMap<V>,
}

impl<V> ListCollection<V> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: OrderedMap::new(),
        }
    }

    /// Creates an empty list with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: OrderedMap::with_capacity(capacity),
        }
    }

    /// Appends a value under the next free index.
    pub fn add(&mut self, value: V) -> &mut Self {
        let key = index_key(self.map.len());
        self.map.insert(key, value);
        self
    }

    /// Overwrites the value at `index`, or appends when `index == count()`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::Position` when `index > count()`, since that would
    /// leave a gap in the keys.
    pub fn set(&mut self, index: usize, value: V) -> Result<&mut Self> {
        let count = self.map.len();
        if index > count {
            return Err(OutOfBounds::Position {
                position: index,
                count,
            }
            .into());
        }
        self.map.insert(index_key(index), value);
        Ok(self)
    }

    /// Removes the value at `index` and closes the gap.
    pub fn remove(&mut self, index: usize) -> Option<V> {
        let key = index_key(index);
        let removed = self.map.remove(&key)?;
        self.map.reset_keys();
        Some(removed)
    }

    /// Removes every value.
    pub fn clear(&mut self) -> &mut Self {
        self.map.clear();
        self
    }

    /// Replaces every value.
    pub fn set_all<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
    {
        *self = values.into_iter().collect();
        self
    }

    /// Consumes the list and returns its values in order.
    pub fn into_values(self) -> Vec<V> {
        self.map.into_iter().map(|(_, value)| value).collect()
    }

    /// Converts the list into a JSON array.
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
}

impl<V> Default for ListCollection<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Seekable for ListCollection<V> {
    type Value = V;

    fn ordered_map(&self) -> &OrderedMap<V> {
        &self.map
    }

    fn slots(&mut self) -> Slots<'_, V> {
        Slots::new(&mut self.map)
    }
}

impl<V> Sliceable for ListCollection<V> {
    /// Keeps the order of `pairs` and discards their keys.
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, V)>,
    {
        pairs.into_iter().map(|(_, value)| value).collect()
    }
}

impl<V> FromIterator<V> for ListCollection<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .enumerate()
                .map(|(index, value)| (index_key(index), value))
                .collect(),
        }
    }
}

impl<V> Extend<V> for ListCollection<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<V> From<Vec<V>> for ListCollection<V> {
    fn from(values: Vec<V>) -> Self {
        values.into_iter().collect()
    }
}

impl<V> Index<usize> for ListCollection<V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        self.map
            .lookup(index_key(index).as_key_ref())
            .unwrap_or_else(|| panic!("index {index} out of range for ListCollection of {} items", self.count()))
    }
}

impl<V> IntoIterator for ListCollection<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_values().into_iter()
    }
}

impl<V: Serialize> Serialize for ListCollection<V> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut sequence = serializer.serialize_seq(Some(self.count()))?;
        for value in self.values() {
            sequence.serialize_element(value)?;
        }
        sequence.end()
    }
}

struct ListCollectionVisitor<V> {
    marker: std::marker::PhantomData<V>,
}

impl<'de, V> Visitor<'de> for ListCollectionVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = ListCollection<V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut sequence: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = sequence.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut list = ListCollection::with_capacity(capacity);
        while let Some(value) = sequence.next_element()? {
            list.add(value);
        }
        Ok(list)
    }
}

impl<'de, V> Deserialize<'de> for ListCollection<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ListCollectionVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
