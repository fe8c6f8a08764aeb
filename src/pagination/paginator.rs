//! Page windows over a seekable collection.

use std::num::NonZeroUsize;

use crate::cursor::{Fetched, Seekable};
use crate::error::{OutOfBounds, Result};
use crate::slice::Sliceable;

use super::PaginatorConfig;

/// Materializes one page of a collection at a time.
///
/// The paginator drives the collection's own cursor (`seek` followed by
/// `sc_next`), so the collection's cursor ends on the last pair of the page
/// that was materialized. Pages are built with [`Sliceable::from_pairs`] and
/// therefore have the same concrete type as the source; they can be paginated
/// again.
///
/// # Examples
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use keyed_cursor::prelude::*;
///
/// let mut list: ListCollection<i32> = (1..=10).collect();
/// let mut paginator = Paginator::new(&mut list, 3, NonZeroUsize::new(3).unwrap());
///
/// let page = paginator.materialize_page().unwrap();
/// assert_eq!(page.into_values(), vec![7, 8, 9]);
/// assert_eq!(paginator.page_count(), 4);
/// ```
#[derive(Debug)]
pub struct Paginator<'a, C> {
    collection: &'a mut C,
    page: i64,
    items_per_page: NonZeroUsize,
}

impl<'a, C> Paginator<'a, C>
where
    C: Sliceable,
    C::Value: Clone,
{
    /// Creates a paginator for `page` (1-based) with `items_per_page` items.
    pub const fn new(collection: &'a mut C, page: i64, items_per_page: NonZeroUsize) -> Self {
        Self {
            collection,
            page,
            items_per_page,
        }
    }

    /// Creates a paginator from a configuration.
    pub const fn with_config(collection: &'a mut C, config: PaginatorConfig) -> Self {
        Self::new(collection, config.page, config.items_per_page)
    }

    /// Builds the current page.
    ///
    /// A page that starts past the last pair is empty.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::PageStart` when the page number is below 1.
    pub fn materialize_page(&mut self) -> Result<C> {
        self.collect_page(self.page)
    }

    /// Number of items on the current page.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::PageStart` when the page number is below 1.
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.materialize_page()?.count())
    }

    /// Returns `true` when the current page holds no items.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds::PageStart` when the page number is below 1.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of pages needed for the whole collection.
    pub fn page_count(&self) -> usize {
        self.collection.count().div_ceil(self.items_per_page.get())
    }

    /// Iterates over every page in order, from page 1 to [`Self::page_count`].
    ///
    /// The configured page number is left unchanged.
    pub fn pages(&mut self) -> Pages<'_, 'a, C> {
        let last_page = i64::try_from(self.page_count()).unwrap_or(i64::MAX);
        Pages {
            paginator: self,
            next_page: 1,
            last_page,
        }
    }

    /// The configured 1-based page number.
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Sets the page number.
    pub const fn set_page(&mut self, page: i64) -> &mut Self {
        self.page = page;
        self
    }

    /// The configured page size.
    pub const fn items_per_page(&self) -> NonZeroUsize {
        self.items_per_page
    }

    /// Sets the page size.
    pub const fn set_items_per_page(&mut self, items_per_page: NonZeroUsize) -> &mut Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Read access to the paginated collection.
    pub fn collection(&self) -> &C {
        self.collection
    }

    fn collect_page(&mut self, page: i64) -> Result<C> {
        if page < 1 {
            return Err(OutOfBounds::PageStart { page }.into());
        }
        let per_page = self.items_per_page.get();
        let start = usize::try_from(page - 1)
            .ok()
            .and_then(|preceding| preceding.checked_mul(per_page));
        let Some(start) = start else {
            tracing::debug!(page, per_page, "page start overflows, returning an empty page");
            return Ok(C::from_pairs(std::iter::empty()));
        };

        let first = match self.collection.seek(start) {
            Ok(value) => value.clone(),
            Err(error) if error.is_out_of_bounds() => {
                tracing::debug!(page, start, %error, "page starts past the last item");
                return Ok(C::from_pairs(std::iter::empty()));
            }
            Err(error) => return Err(error),
        };

        let mut pairs = Vec::with_capacity(per_page.min(self.collection.count() - start));
        if let Some(key) = self.collection.key() {
            pairs.push((key.clone(), first));
        }
        for _ in 1..per_page {
            let value = match self.collection.sc_next() {
                Fetched::Value(value) => value.clone(),
                Fetched::NotSet => break,
            };
            if let Some(key) = self.collection.key() {
                pairs.push((key.clone(), value));
            }
        }
        Ok(C::from_pairs(pairs))
    }
}

/// Iterator over every page of a [`Paginator`].
#[derive(Debug)]
pub struct Pages<'p, 'a, C> {
    paginator: &'p mut Paginator<'a, C>,
    next_page: i64,
    last_page: i64,
}

impl<C> Iterator for Pages<'_, '_, C>
where
    C: Sliceable,
    C::Value: Clone,
{
    type Item = C;

    fn next(&mut self) -> Option<C> {
        if self.next_page > self.last_page {
            return None;
        }
        let page = self.paginator.collect_page(self.next_page).ok()?;
        self.next_page += 1;
        Some(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Seekable;
    use crate::key::Key;
    use crate::list::ListCollection;
    use crate::ordered_map::OrderedMap;
    use rstest::{fixture, rstest};

    fn per_page(size: usize) -> NonZeroUsize {
        NonZeroUsize::new(size).unwrap()
    }

    #[fixture]
    fn ten() -> ListCollection<i32> {
        (1..=10).collect()
    }

    #[fixture]
    fn assoc() -> OrderedMap<serde_json::Value> {
        let mut map = OrderedMap::new();
        map.set("leet", serde_json::json!(1337))
            .unwrap()
            .set("why", serde_json::json!(42))
            .unwrap()
            .set(4, serde_json::json!("is random"))
            .unwrap()
            .set("PHP-v", serde_json::json!(7))
            .unwrap();
        map
    }

    #[rstest]
    #[case(1, 1, vec![1])]
    #[case(1, 2, vec![1, 2])]
    #[case(3, 3, vec![7, 8, 9])]
    #[case(4, 3, vec![10])]
    #[case(1, 15, (1..=10).collect())]
    #[case(2, 15, vec![])]
    fn test_list_pages(
        mut ten: ListCollection<i32>,
        #[case] page: i64,
        #[case] size: usize,
        #[case] expected: Vec<i32>,
    ) {
        let mut paginator = Paginator::new(&mut ten, page, per_page(size));
        assert_eq!(paginator.materialize_page().unwrap().into_values(), expected);
    }

    #[rstest]
    #[case(1, 1, vec!["leet"])]
    #[case(1, 2, vec!["leet", "why"])]
    #[case(2, 2, vec!["4", "PHP-v"])]
    #[case(2, 3, vec!["PHP-v"])]
    #[case(1, 15, vec!["leet", "why", "4", "PHP-v"])]
    #[case(2, 15, vec![])]
    fn test_assoc_pages_keep_keys(
        mut assoc: OrderedMap<serde_json::Value>,
        #[case] page: i64,
        #[case] size: usize,
        #[case] expected: Vec<&str>,
    ) {
        let mut paginator = Paginator::new(&mut assoc, page, per_page(size));
        let keys: Vec<String> = paginator
            .materialize_page()
            .unwrap()
            .keys()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, expected);
    }

    #[rstest]
    fn test_assoc_page_keeps_integer_key(mut assoc: OrderedMap<serde_json::Value>) {
        let mut paginator = Paginator::new(&mut assoc, 2, per_page(2));
        let page = paginator.materialize_page().unwrap();
        assert_eq!(page.get(4), Some(&serde_json::json!("is random")));
        assert!(!page.has("4"));
    }

    #[rstest]
    #[case(0)]
    #[case(-2)]
    fn test_page_below_one_is_rejected(mut ten: ListCollection<i32>, #[case] page: i64) {
        let mut paginator = Paginator::new(&mut ten, page, per_page(2));
        let error = paginator.materialize_page().unwrap_err();
        assert!(error.is_out_of_bounds());
    }

    #[rstest]
    fn test_empty_collection_gives_empty_page() {
        let mut empty: ListCollection<i32> = ListCollection::new();
        let mut paginator = Paginator::new(&mut empty, 1, per_page(15));
        assert!(paginator.is_empty().unwrap());
        assert_eq!(paginator.page_count(), 0);
    }

    #[rstest]
    fn test_huge_page_is_empty(mut ten: ListCollection<i32>) {
        let mut paginator = Paginator::new(&mut ten, i64::MAX, per_page(usize::MAX));
        assert_eq!(paginator.len().unwrap(), 0);
    }

    #[rstest]
    fn test_page_count(mut ten: ListCollection<i32>) {
        let mut paginator = Paginator::new(&mut ten, 1, per_page(3));
        assert_eq!(paginator.page_count(), 4);
        paginator.set_items_per_page(per_page(5));
        assert_eq!(paginator.page_count(), 2);
        assert_eq!(paginator.items_per_page().get(), 5);
    }

    #[rstest]
    fn test_setters(mut ten: ListCollection<i32>) {
        let mut paginator = Paginator::with_config(&mut ten, PaginatorConfig::default());
        paginator.set_page(2).set_items_per_page(per_page(4));
        assert_eq!(paginator.page(), 2);
        assert_eq!(paginator.materialize_page().unwrap().into_values(), vec![5, 6, 7, 8]);
    }

    #[rstest]
    fn test_pages_cover_collection(mut ten: ListCollection<i32>) {
        let mut paginator = Paginator::new(&mut ten, 2, per_page(4));
        let pages: Vec<Vec<i32>> = paginator.pages().map(ListCollection::into_values).collect();
        assert_eq!(pages, vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10]]);
        assert_eq!(paginator.page(), 2);
    }

    #[rstest]
    fn test_page_is_pageable_again(mut ten: ListCollection<i32>) {
        let mut first = Paginator::new(&mut ten, 1, per_page(6));
        let mut page = first.materialize_page().unwrap();
        let mut nested = Paginator::new(&mut page, 2, per_page(4));
        assert_eq!(nested.materialize_page().unwrap().into_values(), vec![5, 6]);
    }

    #[rstest]
    fn test_page_preserves_falsy_values() {
        let mut map: OrderedMap<serde_json::Value> = [
            serde_json::json!(0),
            serde_json::json!(false),
            serde_json::json!(null),
            serde_json::json!(""),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, value)| (Key::from(u32::try_from(index).unwrap()), value))
        .collect();
        let mut paginator = Paginator::new(&mut map, 1, per_page(10));
        assert_eq!(paginator.len().unwrap(), 4);
    }
}
