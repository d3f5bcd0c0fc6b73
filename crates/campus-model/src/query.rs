//! Query descriptors.
//!
//! A [`QueryDescriptor`] is the complete "what subset is requested" state for
//! one list: page, page size, free-text search, equality filters and an
//! optional sort. It is a plain value; the rules for mutating it live in the
//! list state that owns it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter value meaning "do not filter on this key".
pub const FILTER_ALL: &str = "all";

/// Page size used when a resource does not declare one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Query parameter names the list request already uses. Filters keyed by
/// one of these never restrict results.
pub const RESERVED_FILTER_KEYS: [&str; 5] = ["page", "limit", "search", "sortBy", "order"];

/// Returns `true` when a filter value restricts results.
///
/// Empty values and [`FILTER_ALL`] (case-insensitive) are skipped entirely.
pub fn is_active_filter(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.eq_ignore_ascii_case(FILTER_ALL)
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Wire form used in query strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key for a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Filter, page and sort state driving a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    /// 1-based page number.
    pub page: usize,
    /// Items per page, always greater than zero.
    pub page_size: usize,
    /// Free-text search, matched against the resource's search fields.
    #[serde(default)]
    pub search: String,
    /// Equality filters keyed by field name.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    /// Optional sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortSpec>,
}

impl QueryDescriptor {
    /// First page, no search, no filters.
    ///
    /// A `page_size` of zero is raised to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
            sort_by: None,
        }
    }

    /// Set the page (builder style, no clamping).
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the search text (builder style).
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Add a filter (builder style).
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Set the sort (builder style).
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort_by = Some(sort);
        self
    }

    /// Filters that actually restrict results, in key order, with trimmed
    /// values. Keys in [`RESERVED_FILTER_KEYS`] are skipped.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(key, value)| {
                is_active_filter(value) && !RESERVED_FILTER_KEYS.contains(&key.as_str())
            })
            .map(|(key, value)| (key.as_str(), value.trim()))
    }

    /// Trimmed search text, or `None` when no search is applied.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Zero-based offset of the first item on the requested page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
