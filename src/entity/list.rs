//! Dense list of entities.

use serde::de::DeserializeOwned;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::cursor::{Seekable, Slots};
use crate::error::Result;
use crate::key::Key;
use crate::list::ListCollection;
use crate::ordered_map::OrderedMap;
use crate::slice::Sliceable;
use crate::structured::Structured;

use super::{Entity, ThroughHook, entities_from_structured, entity_from_structured};

/// A list of entities keyed `0..n-1`.
///
/// Behaves like [`ListCollection`] and adds structured hydration. Its
/// structured form is an array of the entities' own structured forms.
///
/// # Examples
///
/// ```rust
/// use keyed_cursor::prelude::*;
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Clone, Debug, Serialize, Deserialize)]
/// struct Tag(String);
///
/// impl Entity for Tag {}
///
/// let mut tags = EntityListCollection::from_structured(json!(["red", "blue"])).unwrap();
/// tags.add(Tag("green".to_owned()));
///
/// assert_eq!(tags.count(), 3);
/// assert_eq!(tags.to_structured().unwrap(), json!(["red", "blue", "green"]));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityListCollection<E> {
    items: ListCollection<E>,
}

impl<E: Entity> EntityListCollection<E> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: ListCollection::new(),
        }
    }

    /// Appends an entity.
    pub fn add(&mut self, entity: E) -> &mut Self {
        self.items.add(entity);
        self
    }

    /// Overwrites the entity at `index`, or appends when `index == count()`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::Position` when `index > count()`.
    pub fn set(&mut self, index: usize, entity: E) -> Result<&mut Self> {
        self.items.set(index, entity)?;
        Ok(self)
    }

    /// Removes the entity at `index` and closes the gap.
    pub fn remove(&mut self, index: usize) -> Option<E> {
        self.items.remove(index)
    }

    /// Removes every entity.
    pub fn clear(&mut self) -> &mut Self {
        self.items.clear();
        self
    }

    /// Replaces every entity.
    pub fn set_all<I>(&mut self, entities: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
    {
        self.items.set_all(entities);
        self
    }

    /// Consumes the collection and returns its entities in order.
    pub fn into_entities(self) -> Vec<E> {
        self.items.into_values()
    }
}

impl<E> EntityListCollection<E>
where
    E: Entity + DeserializeOwned,
{
    /// Hydrates a collection from an array (or the values of an object) of
    /// structured entities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEntity` if the value is not an array or object, or if
    /// any element does not describe an `E`.
    pub fn from_structured(structured: Structured) -> Result<Self> {
        Ok(entities_from_structured(structured)?.into_iter().collect())
    }

    /// Hydrates one entity and appends it.
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

impl<E: Entity> Default for EntityListCollection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Entity for EntityListCollection<E> {
    fn to_structured(&self) -> Result<Structured> {
        self.values()
            .map(Entity::to_structured)
            .collect::<Result<Vec<_>>>()
            .map(Structured::Array)
    }
}

impl<E: Entity> Serialize for EntityListCollection<E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut sequence = serializer.serialize_seq(Some(self.count()))?;
        for entity in self.values() {
            sequence.serialize_element(&ThroughHook(entity))?;
        }
        sequence.end()
    }
}

impl<E> Seekable for EntityListCollection<E> {
    type Value = E;

    fn ordered_map(&self) -> &OrderedMap<E> {
        self.items.ordered_map()
    }

    fn slots(&mut self) -> Slots<'_, E> {
        self.items.slots()
    }
}

impl<E> Sliceable for EntityListCollection<E> {
    fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Key, E)>,
    {
        Self {
            items: ListCollection::from_pairs(pairs),
        }
    }
}

impl<E> FromIterator<E> for EntityListCollection<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<E> Extend<E> for EntityListCollection<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyMatch;
    use rstest::{fixture, rstest};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
    }

    impl Entity for Item {}

    #[fixture]
    fn items() -> EntityListCollection<Item> {
        [42, 66, 90].into_iter().map(|id| Item { id }).collect()
    }

    #[rstest]
    fn test_add_appends_dense_keys() {
        let mut collection = EntityListCollection::new();
        collection.add(Item { id: 42 });
        collection.add(Item { id: 7 });
        assert!(collection.has(0));
        assert!(collection.has(1));
        assert_eq!(collection.count(), 2);
    }

    #[rstest]
    fn test_remove_rekeys(mut items: EntityListCollection<Item>) {
        assert_eq!(items.remove(0), Some(Item { id: 42 }));
        assert_eq!(items.get(0), Some(&Item { id: 66 }));
        assert!(!items.has(2));
    }

    #[rstest]
    fn test_contains(items: EntityListCollection<Item>) {
        assert!(items.contains(|item, key| key.as_int() < Some(3) && item.id == 66));
        assert!(!items.contains(|item, _| item.id == 2));
    }

    #[rstest]
    fn test_filter_and_slice_stay_dense(items: EntityListCollection<Item>) {
        let filtered = items.filter(|item, _| item.id > 50);
        assert_eq!(filtered.get(0), Some(&Item { id: 66 }));
        let sliced = items.slice_from_key(1, KeyMatch::Strict);
        assert_eq!(sliced.keys().cloned().collect::<Vec<_>>(), vec![Key::from(0), Key::from(1)]);
    }

    #[rstest]
    fn test_set_all_rekeys(mut items: EntityListCollection<Item>) {
        items.set_all(vec![Item { id: 1 }]);
        assert_eq!(items.count(), 1);
        assert_eq!(items.current(), Some(&Item { id: 1 }));
    }

    #[rstest]
    fn test_to_structured(items: EntityListCollection<Item>) {
        assert_eq!(
            items.to_structured().unwrap(),
            json!([{"id": 42}, {"id": 66}, {"id": 90}])
        );
        assert_eq!(serde_json::to_value(&items).unwrap(), items.to_structured().unwrap());
    }

    #[rstest]
    fn test_empty_structured_is_empty_array() {
        let empty: EntityListCollection<Item> = EntityListCollection::default();
        assert_eq!(empty.to_structured().unwrap(), json!([]));
    }

    #[rstest]
    fn test_add_structured_rejects_bad_shape(mut items: EntityListCollection<Item>) {
        let error = items.add_structured(json!({"id": "x"})).unwrap_err();
        assert!(error.is_invalid_entity());
        assert_eq!(items.count(), 3);

        items.add_structured(json!({"id": 5})).unwrap();
        assert_eq!(items.get(3), Some(&Item { id: 5 }));
    }
}
