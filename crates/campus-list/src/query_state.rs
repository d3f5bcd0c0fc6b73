//! List query state.
//!
//! Single source of truth for "what subset of data is currently requested".
//! Every mutation returns the resulting descriptor; the owner is expected to
//! refetch after each one.

use std::collections::BTreeMap;

use campus_model::{QueryDescriptor, ResourceSpec, SortSpec, is_active_filter};

/// Filter, search, sort and page state of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
    descriptor: QueryDescriptor,
    default_filters: BTreeMap<String, String>,
    total_pages: usize,
}

impl ListQueryState {
    /// Initial state for a resource: its page size and declared filter defaults.
    pub fn new(resource: &ResourceSpec) -> Self {
        Self {
            descriptor: resource.initial_query(),
            default_filters: resource.default_filters.clone(),
            total_pages: 1,
        }
    }

    /// Initial state from explicit defaults.
    pub fn with_defaults(page_size: usize, default_filters: BTreeMap<String, String>) -> Self {
        Self {
            descriptor: QueryDescriptor {
                filters: default_filters.clone(),
                ..QueryDescriptor::new(page_size)
            },
            default_filters,
            total_pages: 1,
        }
    }

    /// The descriptor a fetch should use.
    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.descriptor.page
    }

    /// Last known page count (1 before the first load).
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Record the page count reported by the last load.
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages.max(1);
    }

    /// Set one filter and go back to page 1.
    ///
    /// Keys are schema-less and stored as given.
    pub fn set_filter(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &QueryDescriptor {
        self.descriptor.filters.insert(key.into(), value.into());
        self.descriptor.page = 1;
        &self.descriptor
    }

    /// Set the search text and go back to page 1.
    pub fn set_search(&mut self, search: impl Into<String>) -> &QueryDescriptor {
        self.descriptor.search = search.into();
        self.descriptor.page = 1;
        &self.descriptor
    }

    /// Jump to page `page`, clamped to `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) -> &QueryDescriptor {
        self.descriptor.page = page.clamp(1, self.total_pages);
        &self.descriptor
    }

    /// Go to the next page, staying on the last one.
    pub fn next_page(&mut self) -> &QueryDescriptor {
        self.set_page(self.descriptor.page.saturating_add(1))
    }

    /// Go to the previous page, staying on the first one.
    pub fn prev_page(&mut self) -> &QueryDescriptor {
        self.set_page(self.descriptor.page.saturating_sub(1))
    }

    /// Change the page size and go back to page 1. Zero is raised to one.
    pub fn set_page_size(&mut self, page_size: usize) -> &QueryDescriptor {
        self.descriptor.page_size = page_size.max(1);
        self.descriptor.page = 1;
        &self.descriptor
    }

    /// Change the sort and go back to page 1.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> &QueryDescriptor {
        self.descriptor.sort_by = sort;
        self.descriptor.page = 1;
        &self.descriptor
    }

    /// Restore declared filter defaults, empty the search, go back to page 1.
    ///
    /// Page size and sort are kept.
    pub fn clear(&mut self) -> &QueryDescriptor {
        self.descriptor.filters = self.default_filters.clone();
        self.descriptor.search.clear();
        self.descriptor.page = 1;
        &self.descriptor
    }

    /// Whether any filter or search currently narrows the list.
    pub fn is_narrowed(&self) -> bool {
        self.descriptor.search_term().is_some()
            || self
                .descriptor
                .filters
                .values()
                .any(|value| is_active_filter(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ListQueryState {
        let resource = ResourceSpec::new("courses")
            .with_page_size(20)
            .with_default_filter("status", "all");
        ListQueryState::new(&resource)
    }

    #[test]
    fn test_set_filter_resets_page() {
        let mut query = state();
        query.set_total_pages(5);
        query.set_page(4);
        let descriptor = query.set_filter("level", "advanced");
        assert_eq!(descriptor.page, 1);
        assert_eq!(
            descriptor.filters.get("level").map(String::as_str),
            Some("advanced")
        );
    }

    #[test]
    fn test_set_search_resets_page() {
        let mut query = state();
        query.set_total_pages(3);
        query.set_page(3);
        assert_eq!(query.set_search("react").page, 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut query = state();
        query.set_total_pages(3);
        assert_eq!(query.set_page(0).page, 1);
        assert_eq!(query.set_page(2).page, 2);
        assert_eq!(query.set_page(99).page, 3);
    }

    #[test]
    fn test_set_page_before_first_load_stays_on_one() {
        let mut query = state();
        assert_eq!(query.set_page(2).page, 1);
    }

    #[test]
    fn test_next_and_prev_page() {
        let mut query = state();
        query.set_total_pages(2);
        assert_eq!(query.prev_page().page, 1);
        assert_eq!(query.next_page().page, 2);
        assert_eq!(query.next_page().page, 2);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut query = state();
        query.set_filter("status", "published");
        query.set_filter("level", "beginner");
        query.set_search("rust");
        query.set_sort(Some(SortSpec::asc("title")));
        assert!(query.is_narrowed());

        let descriptor = query.clear();
        assert_eq!(descriptor.page, 1);
        assert!(descriptor.search.is_empty());
        assert_eq!(descriptor.filters.len(), 1);
        assert_eq!(
            descriptor.filters.get("status").map(String::as_str),
            Some("all")
        );
        assert!(descriptor.sort_by.is_some());
        assert!(!query.is_narrowed());
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut query = state();
        query.set_total_pages(4);
        query.set_page(4);
        let descriptor = query.set_page_size(0);
        assert_eq!(descriptor.page_size, 1);
        assert_eq!(descriptor.page, 1);
    }
}
