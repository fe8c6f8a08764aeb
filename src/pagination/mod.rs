//! Page-based windowing over seekable collections.
//!
//! - [`Paginator`]: materializes one page (1-based page number, fixed page
//!   size) as a new collection of the source's concrete type.
//! - [`PaginatorConfig`]: deserializable page settings with defaults.
//!
//! A page is collected by seeking the source cursor to the first item of the
//! page and advancing with the sentinel-aware `sc_next` until the page is full
//! or [`crate::cursor::Fetched::NotSet`] reports the end of the collection.
//! Stored `null`/`false`/`0` values therefore never cut a page short.
//!
//! # Examples
//!
//! ```rust
//! use keyed_cursor::prelude::*;
//!
//! let mut map = OrderedMap::new();
//! map.set("leet", 1337).unwrap().set("why", 42).unwrap().set(4, 7).unwrap();
//!
//! let config = PaginatorConfig::new(2, std::num::NonZeroUsize::new(2).unwrap());
//! let mut paginator = Paginator::with_config(&mut map, config);
//! let page = paginator.materialize_page().unwrap();
//!
//! assert_eq!(page.get(4), Some(&7));
//! assert_eq!(page.count(), 1);
//! ```

mod config;
mod paginator;

pub use config::DEFAULT_ITEMS_PER_PAGE;
pub use config::PaginatorConfig;
pub use paginator::Pages;
pub use paginator::Paginator;
