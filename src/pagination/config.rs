//! Paginator configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Items per page when nothing else is configured.
pub const DEFAULT_ITEMS_PER_PAGE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// Page window settings.
///
/// Missing fields fall back to [`PaginatorConfig::default`] when deserialized,
/// and a zero `items_per_page` is rejected by the deserializer.
///
/// # Examples
///
/// ```rust
/// use keyed_cursor::pagination::PaginatorConfig;
///
/// let config: PaginatorConfig = serde_json::from_str(r#"{"page": 3}"#).unwrap();
/// assert_eq!(config.page, 3);
/// assert_eq!(config.items_per_page.get(), 10);
///
/// assert!(serde_json::from_str::<PaginatorConfig>(r#"{"items_per_page": 0}"#).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorConfig {
    /// 1-based page number.
    pub page: i64,
    /// Size of every page.
    pub items_per_page: NonZeroUsize,
}

impl PaginatorConfig {
    /// Creates a configuration for `page` with `items_per_page` items.
    #[must_use]
    pub const fn new(page: i64, items_per_page: NonZeroUsize) -> Self {
        Self {
            page,
            items_per_page,
        }
    }
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self::new(1, DEFAULT_ITEMS_PER_PAGE)
    }
}
