//! # keyed-cursor
//!
//! Ordered keyed containers with a stateful cursor, key-based slicing,
//! pagination and typed entity collections.
//!
//! ## Overview
//!
//! - **Keys**: integer or string only, checked at write time ([`key`])
//! - **Ordered map**: insertion-ordered pairs plus one cursor ([`ordered_map`])
//! - **Cursor protocol**: `rewind`/`next`/`prev`/`seek` with a `NotSet`
//!   sentinel that cannot collide with stored values ([`cursor`])
//! - **Slicing**: `filter`, `slice_by_key`, `for_all`, `contains` ([`slice`])
//! - **Lists**: dense `0..n-1` keyed variant ([`list`])
//! - **Pagination**: 1-based pages materialized as new collections
//! - **Entities**: collections of values that know their structured form and,
//!   optionally, their own key
//!
//! ## Feature Flags
//!
//! - `pagination`: [`Paginator`](pagination::Paginator) and its configuration
//!   (default)
//! - `entity`: entity traits and collections (default)
//! - `fxhash`: hash keys with `rustc-hash` instead of SipHash
//!
//! ## Example
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//!
//! let mut map = OrderedMap::new();
//! map.set("a", 1).unwrap().set("b", 2).unwrap().set(3, 3).unwrap();
//!
//! assert_eq!(map.seek(1), Ok(&2));
//! assert_eq!(map.next(), Some(&3));
//! assert_eq!(map.next(), None);
//!
//! assert_eq!(map.seek_to_key("3", KeyMatch::Loose), Ok(&3));
//! assert!(map.seek_to_key("3", KeyMatch::Strict).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collections, their traits and the error types.
///
/// # Usage
///
/// ```rust
/// use keyed_cursor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cursor::{Fetched, Position, Seekable, Slots};
    pub use crate::error::{CollectionError, OutOfBounds, Result};
    pub use crate::key::{IntoKey, Key, KeyMatch, KeyRef};
    pub use crate::list::ListCollection;
    pub use crate::ordered_map::OrderedMap;
    pub use crate::slice::Sliceable;
    pub use crate::structured::Structured;

    #[cfg(feature = "pagination")]
    pub use crate::pagination::{Paginator, PaginatorConfig};

    #[cfg(feature = "entity")]
    pub use crate::entity::{AssocEntity, Entity, EntityAssocCollection, EntityListCollection};
}

pub mod cursor;
pub mod error;
pub mod key;
pub mod list;
pub mod ordered_map;
pub mod slice;
pub mod structured;

#[cfg(feature = "pagination")]
pub mod pagination;

#[cfg(feature = "entity")]
pub mod entity;
