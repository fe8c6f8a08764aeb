//! Error types for collection operations.
//!
//! Every fallible operation returns [`Result`]. Errors are raised synchronously
//! and never leave a collection half-modified: a rejected key or entity is
//! detected before the collection is touched.

use thiserror::Error;

use crate::key::Key;

/// Canonical result for this crate.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Describes which bound a cursor or page request ran past.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OutOfBounds {
    /// A zero-based seek position at or past the end of the collection.
    #[error("invalid seek position: {position} (collection holds {count} items)")]
    Position {
        /// Requested position.
        position: usize,
        /// Number of items in the collection at the time of the seek.
        count: usize,
    },

    /// No key matched a key search.
    #[error("invalid seek key: {key}")]
    Key {
        /// The key that was searched for.
        key: Key,
    },

    /// A page number below 1.
    #[error("page start index cannot be lower than 1, got page {page}")]
    PageStart {
        /// Requested page.
        page: i64,
    },
}

/// Errors raised by collections, cursors and paginators.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A key that is neither an integer nor a string.
    #[error("invalid key given: {found}")]
    InvalidKey {
        /// Kind of value that was offered as a key.
        found: &'static str,
    },

    /// A seek, key search or page request past the available items.
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    /// A structured value that does not describe the collection's entity type.
    #[error("invalid entity: {reason}")]
    InvalidEntity {
        /// Why the value was rejected.
        reason: String,
    },

    /// Conversion into the structured representation failed.
    #[error("serialization failed: {reason}")]
    Serialization {
        /// Message from the serializer.
        reason: String,
    },
}

impl CollectionError {
    /// Builds an [`CollectionError::InvalidKey`] and records the rejection.
    pub(crate) fn invalid_key(found: &'static str) -> Self {
        tracing::debug!(found, "rejected collection key");
        Self::InvalidKey { found }
    }

    /// Builds an [`CollectionError::InvalidEntity`] and records the rejection.
    pub(crate) fn invalid_entity(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::debug!(%reason, "rejected entity");
        Self::InvalidEntity { reason }
    }

    /// Check if this error is an out-of-bounds cursor or page request.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds(_))
    }

    /// Check if this error is a rejected key.
    #[must_use]
    pub const fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }

    /// Check if this error is a rejected entity.
    #[must_use]
    pub const fn is_invalid_entity(&self) -> bool {
        matches!(self, Self::InvalidEntity { .. })
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_out_of_bounds_display() {
        let error: CollectionError = OutOfBounds::Position {
            position: 6,
            count: 6,
        }
        .into();
        assert_eq!(
            error.to_string(),
            "invalid seek position: 6 (collection holds 6 items)"
        );
        assert!(error.is_out_of_bounds());
    }

    #[rstest]
    fn test_page_start_display() {
        let error = CollectionError::from(OutOfBounds::PageStart { page: 0 });
        assert_eq!(
            error.to_string(),
            "page start index cannot be lower than 1, got page 0"
        );
    }

    #[rstest]
    fn test_key_display() {
        let error = CollectionError::from(OutOfBounds::Key {
            key: Key::from("missing"),
        });
        assert_eq!(error.to_string(), "invalid seek key: missing");
    }

    #[rstest]
    fn test_classification() {
        let key_error = CollectionError::invalid_key("bool");
        let entity_error = CollectionError::invalid_entity("missing field `index`");

        assert!(key_error.is_invalid_key());
        assert!(!key_error.is_out_of_bounds());
        assert!(entity_error.is_invalid_entity());
        assert_eq!(entity_error.to_string(), "invalid entity: missing field `index`");
    }

    #[rstest]
    fn test_error_trait() {
        let error = CollectionError::invalid_key("null");
        let _: &dyn std::error::Error = &error;
    }
}
