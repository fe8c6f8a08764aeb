//! Structured (JSON-shaped) representation of collections.
//!
//! [`Structured`] is the plain ordered key/value form handed to a JSON encoder.
//! Map-like collections become objects (in insertion order), list-like
//! collections become arrays. Entity collections defer to each entity's own
//! hook, see [`crate::entity::Entity`].

use serde::Serialize;

use crate::error::Result;

/// Plain structured value.
pub type Structured = serde_json::Value;

/// Serializes any `Serialize` value into its structured form.
///
/// # Errors
///
/// Returns `Serialization` when the value cannot be represented, for example a
/// map keyed by something other than strings or integers.
pub fn to_structured_value<T>(value: &T) -> Result<Structured>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}
