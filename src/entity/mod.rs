//! Typed entity collections.
//!
//! Entities are values that expose a structured form ([`Entity`]) and,
//! for keyed storage, a collection index ([`AssocEntity`]). The capabilities
//! are traits, so a collection that requires them is checked at compile time.
//! Structural validation happens at the dynamic edge instead: hydrating a
//! collection from a [`Structured`] value rejects anything that does not
//! describe the entity type with [`CollectionError::InvalidEntity`].
//!
//! - [`EntityListCollection`]: dense list of entities.
//! - [`EntityAssocCollection`]: entities keyed by their collection index; an
//!   entity whose index is already taken replaces the stored one.
//!
//! Both collections are entities themselves, so they nest.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! impl Entity for User {}
//!
//! impl AssocEntity for User {
//!     fn collection_index(&self) -> Key {
//!         Key::from(self.name.as_str())
//!     }
//! }
//!
//! let users: EntityAssocCollection<User> =
//!     EntityAssocCollection::from_structured(json!([{"name": "ada"}, {"name": "alan"}])).unwrap();
//! assert!(users.has("alan"));
//!
//! let error = EntityAssocCollection::<User>::from_structured(json!([{"nom": "x"}])).unwrap_err();
//! assert!(error.is_invalid_entity());
//! ```

mod assoc;
mod list;

pub use assoc::EntityAssocCollection;
pub use list::EntityListCollection;

use serde::de::DeserializeOwned;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::error::{CollectionError, Result};
use crate::key::Key;
use crate::structured::{Structured, to_structured_value};

/// A value with a structured representation.
///
/// The default hook serializes the entity with serde. Override it to shape the
/// structured form differently.
///
/// Collections always render their entities through the hook. An entity held
/// directly in a field of another entity is rendered by that field's
/// `Serialize` impl, so a field whose type overrides the hook should be
/// annotated with [`serialize_structured`]:
///
/// ```rust
/// use keyed_cursor::prelude::*;
/// use serde::Serialize;
/// use serde_json::json;
///
/// #[derive(Serialize)]
/// struct Badge {
///     label: String,
/// }
///
/// impl Entity for Badge {
///     fn to_structured(&self) -> Result<Structured> {
///         Ok(json!(format!("<{}>", self.label)))
///     }
/// }
///
/// #[derive(Serialize)]
/// struct Profile {
///     #[serde(serialize_with = "keyed_cursor::entity::serialize_structured")]
///     badge: Badge,
/// }
///
/// impl Entity for Profile {}
///
/// let profile = Profile { badge: Badge { label: "new".to_owned() } };
/// assert_eq!(profile.to_structured().unwrap(), json!({"badge": "<new>"}));
/// ```
pub trait Entity: Serialize {
    /// Converts the entity into its structured form.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the entity cannot be represented.
    fn to_structured(&self) -> Result<Structured> {
        to_structured_value(self)
    }
}

/// An entity that decides its own key in an [`EntityAssocCollection`].
pub trait AssocEntity: Entity {
    /// The key this entity is stored under. Must be deterministic.
    fn collection_index(&self) -> Key;
}

/// Serializes `entity` through its [`Entity::to_structured`] hook.
///
/// Usable as `#[serde(serialize_with = "keyed_cursor::entity::serialize_structured")]`.
///
/// # Errors
///
/// Forwards hook failures as a custom serializer error.
pub fn serialize_structured<E, S>(entity: &E, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    E: Entity + ?Sized,
    S: Serializer,
{
    entity
        .to_structured()
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Borrowed entity that serializes through its hook.
struct ThroughHook<'a, E: ?Sized>(&'a E);

impl<E: Entity + ?Sized> Serialize for ThroughHook<'_, E> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_structured(self.0, serializer)
    }
}

/// Deserializes one entity, reporting structural mismatches as `InvalidEntity`.
fn entity_from_structured<E: DeserializeOwned>(structured: Structured) -> Result<E> {
    serde_json::from_value(structured)
        .map_err(|error| CollectionError::invalid_entity(error.to_string()))
}

/// Deserializes an array, or the values of an object, into entities.
fn entities_from_structured<E: DeserializeOwned>(structured: Structured) -> Result<Vec<E>> {
    match structured {
        Structured::Array(items) => items.into_iter().map(entity_from_structured).collect(),
        Structured::Object(fields) => fields
            .into_iter()
            .map(|(_, item)| entity_from_structured(item))
            .collect(),
        other => Err(CollectionError::invalid_entity(format!(
            "expected an array or object of entities, found {}",
            structured_kind(&other)
        ))),
    }
}

const fn structured_kind(structured: &Structured) -> &'static str {
    match structured {
        Structured::Null => "null",
        Structured::Bool(_) => "bool",
        Structured::Number(_) => "number",
        Structured::String(_) => "string",
        Structured::Array(_) => "array",
        Structured::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Entity for Point {}

    #[derive(Serialize)]
    struct Celsius(f64);

    impl Entity for Celsius {
        fn to_structured(&self) -> Result<Structured> {
            Ok(json!(format!("{}°C", self.0)))
        }
    }

    #[rstest]
    fn test_default_hook_uses_serde() {
        assert_eq!(
            Point { x: 1, y: 2 }.to_structured().unwrap(),
            json!({"x": 1, "y": 2})
        );
    }

    #[rstest]
    fn test_hook_can_be_overridden() {
        assert_eq!(Celsius(21.5).to_structured().unwrap(), json!("21.5°C"));
    }

    #[rstest]
    fn test_entities_from_array_and_object() {
        let from_array: Vec<Point> =
            entities_from_structured(json!([{"x": 1, "y": 2}])).unwrap();
        let from_object: Vec<Point> =
            entities_from_structured(json!({"first": {"x": 1, "y": 2}})).unwrap();
        assert_eq!(from_array, from_object);
    }

    #[rstest]
    #[case(json!(3), "number")]
    #[case(json!("point"), "string")]
    #[case(json!(null), "null")]
    fn test_non_container_is_invalid(#[case] structured: Structured, #[case] kind: &str) {
        let error = entities_from_structured::<Point>(structured).unwrap_err();
        assert!(error.is_invalid_entity());
        assert!(error.to_string().contains(kind));
    }

    #[rstest]
    fn test_wrong_shape_is_invalid() {
        let error = entity_from_structured::<Point>(json!({"x": "one"})).unwrap_err();
        assert!(error.is_invalid_entity());
    }
}
