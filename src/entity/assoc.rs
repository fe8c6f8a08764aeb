//! Entities keyed by their own collection index.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::cursor::{Seekable, Slots};
use crate::error::Result;
use crate::key::{Key, KeyRef};
use crate::ordered_map::OrderedMap;
use crate::slice::Sliceable;
use crate::structured::Structured;

use super::{AssocEntity, Entity, ThroughHook, entities_from_structured, entity_from_structured};

/// Entities stored under [`AssocEntity::collection_index`].
///
/// Every insertion derives the key from the entity. When two entities share an
/// index the later one replaces the earlier one and keeps its position.
///
/// # Examples
///
/// ```rust
/// use keyed_cursor::prelude::*;
/// use serde::Serialize;
///
/// #[derive(Clone, Debug, Serialize)]
/// struct Account {
///     iban: String,
///     balance: i64,
/// }
///
/// impl Entity for Account {}
///
/// impl AssocEntity for Account {
///     fn collection_index(&self) -> Key {
///         Key::from(self.iban.as_str())
///     }
/// }
///
/// let mut accounts = EntityAssocCollection::new();
/// accounts.add(Account { iban: "DE01".into(), balance: 10 });
/// accounts.add(Account { iban: "DE01".into(), balance: 25 });
///
/// assert_eq!(accounts.count(), 1);
/// assert_eq!(accounts.get("DE01").map(|account| account.balance), Some(25));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityAssocCollection<E> {
    map: OrderedMap<E>,
}

impl<E: AssocEntity> EntityAssocCollection<E> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: OrderedMap::new(),
        }
    }

    /// Stores an entity under its collection index.
    pub fn add(&mut self, entity: E) -> &mut Self {
        self.map.insert(entity.collection_index(), entity);
        self
    }

    /// Replaces every entity. Colliding indices keep the last entity.
    pub fn set_all<I>(&mut self, entities: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
    {
        *self = entities.into_iter().collect();
        self
    }

    /// Returns `true` if an entity with the same collection index is stored.
    pub fn entity_exists(&self, entity: &E) -> bool {
        self.has(&entity.collection_index())
    }

    /// Removes the entity stored under `key`.
    pub fn remove<'k>(&mut self, key: impl Into<KeyRef<'k>>) -> Option<E> {
        self.map.remove(key)
    }

    /// Removes every entity.
    pub fn clear(&mut self) -> &mut Self {
        self.map.clear();
        self
    }

    /// Consumes the collection and returns its entities in order.
    pub fn into_entities(self) -> Vec<E> {
        self.map.into_iter().map(|(_, entity)| entity).collect()
    }
}

impl<E> EntityAssocCollection<E>
where
    E: AssocEntity + DeserializeOwned,
{
    /// Hydrates a collection from an array (or the values of an object) of
    /// structured entities. Object keys are ignored; each entity supplies its
    /// own.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if the value is not an array or object, or if
    /// any element does not describe an `E`.
    pub fn from_structured(structured: Structured) -> Result<Self> {
        Ok(entities_from_structured(structured)?.into_iter().collect())
    }

    /// Hydrates one entity and stores it under its collection index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if the value does not describe an `E`; the
    /// collection is unchanged in that case.
    pub fn add_structured(&mut self, structured: Structured) -> Result<&mut Self> {
        let entity = entity_from_structured(structured)?;
        Ok(self.add(entity))
    }
}

impl<E: AssocEntity> Default for EntityAssocCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: AssocEntity> Entity for EntityAssocCollection<E> {
    fn to_structured(&self) -> Result<Structured> {
        let mut object = serde_json::Map::with_capacity(self.count());
        for (key, entity) in self.iter() {
            object.insert(key.to_string(), entity.to_structured()?);
        }
        Ok(Structured::Object(object))
    }
}

impl<E: AssocEntity> Serialize for EntityAssocCollection<E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.count()))?;
        for (key, entity) in self.iter() {
            map.serialize_entry(key, &ThroughHook(entity))?;
        }
        map.end()
    }
}

impl<E> Seekable for EntityAssocCollection<E> {
    type Value = E;

    fn ordered_map(&self) -> &OrderedMap<E> {
        &self.map
    }

    fn slots(&mut self) -> Slots<'_, E> {
        Slots::new(&mut self.map)
    }
}

impl<E: AssocEntity> Sliceable for EntityAssocCollection<E> {
    /// Discards the given keys and re-derives them from the entities.
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, E)>,
    {
        pairs.into_iter().map(|(_, entity)| entity).collect()
    }
}

impl<E: AssocEntity> FromIterator<E> for EntityAssocCollection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|entity| (entity.collection_index(), entity))
                .collect(),
        }
    }
}

impl<E: AssocEntity> Extend<E> for EntityAssocCollection<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for entity in iter {
            self.add(entity);
        }
    }
}
