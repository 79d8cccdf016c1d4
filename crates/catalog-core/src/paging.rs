// ── Client-side search and pagination ──
//
// Management views load a whole page filter from the server and then
// search and paginate the loaded list locally.

use catalog_api::{AppVersionPricing, Brand, Pricing, Service};
use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 10;

/// Text an entity can be found by.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match against any field. `needle` must
    /// already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title_ar.as_str(), self.title_en.as_str()];
        fields.extend(self.description_ar.as_deref());
        fields.extend(self.description_en.as_deref());
        fields
    }
}

impl Searchable for Pricing {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title_ar.as_str(), self.title_en.as_str()]
    }
}

impl Searchable for AppVersionPricing {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title_ar.as_str(), self.title_en.as_str()];
        fields.extend(self.subtitle_ar.as_deref());
        fields.extend(self.subtitle_en.as_deref());
        fields
    }
}

impl Searchable for Brand {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.img.as_str()]
    }
}

/// Search term plus the 1-based page to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListQuery {
    /// Change the search term. Always returns to the first page.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self.page = 1;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Filter `items` by `query.search` and cut out `query.page`.
///
/// A page past the end is clamped to the last page.
pub fn paginate<T: Searchable + Clone>(items: &[T], query: &ListQuery) -> PageSlice<T> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase());
    let matched: Vec<&T> = items
        .iter()
        .filter(|item| needle.as_deref().is_none_or(|n| item.matches(n)))
        .collect();

    let per_page = query.per_page.max(1);
    let total_items = matched.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    PageSlice {
        items: matched
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_api::EntityId;

    fn brand(id: u64, img: &str) -> Brand {
        Brand {
            id: EntityId(id),
            img: img.into(),
            order: None,
        }
    }

    fn brands(n: u64) -> Vec<Brand> {
        (1..=n).map(|i| brand(i, &format!("/uploads/logo-{i}.png"))).collect()
    }

    #[test]
    fn pages_are_one_based_with_default_size() {
        let all = brands(23);
        let slice = paginate(&all, &ListQuery::default().with_page(3));

        assert_eq!(slice.total_items, 23);
        assert_eq!(slice.total_pages, 3);
        assert_eq!(slice.items.len(), 3);
        assert_eq!(slice.items[0].id, EntityId(21));
    }

    #[test]
    fn page_past_end_is_clamped() {
        let slice = paginate(&brands(5), &ListQuery::default().with_page(9));
        assert_eq!(slice.page, 1);
        assert_eq!(slice.items.len(), 5);
    }

    #[test]
    fn empty_list_has_one_empty_page() {
        let slice = paginate::<Brand>(&[], &ListQuery::default());
        assert_eq!((slice.page, slice.total_pages, slice.total_items), (1, 1, 0));
    }

    #[test]
    fn search_is_case_insensitive_and_resets_page() {
        let mut all = brands(12);
        all.push(brand(99, "/uploads/ACME.png"));

        let query = ListQuery::default().with_page(2).with_search("acme");
        assert_eq!(query.page, 1);

        let slice = paginate(&all, &query);
        assert_eq!(slice.total_items, 1);
        assert_eq!(slice.items[0].id, EntityId(99));
    }

    #[test]
    fn blank_search_means_no_filter() {
        let query = ListQuery::default().with_search("   ");
        assert!(query.search.is_none());
        assert_eq!(paginate(&brands(4), &query).total_items, 4);
    }
}
