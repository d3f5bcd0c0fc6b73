//! Collection configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::query::{DEFAULT_PAGE_SIZE, QueryDescriptor};

/// List configuration for one backend collection.
///
/// `path` is the REST path segment (`/courses`), `name` the key used by
/// envelopes such as `{"courses": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Collection name, also the envelope key.
    pub name: String,
    /// REST path relative to the API base URL.
    pub path: String,
    /// Text fields the free-text search matches against.
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Items per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Declared filter defaults, restored by "clear filters".
    #[serde(default)]
    pub default_filters: BTreeMap<String, String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ResourceSpec {
    /// Collection whose path equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            search_fields: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            default_filters: BTreeMap::new(),
        }
    }

    /// Set the REST path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the search fields.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Declare a filter default.
    pub fn with_default_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_filters.insert(key.into(), value.into());
        self
    }

    /// Path with surrounding slashes removed.
    pub fn trimmed_path(&self) -> &str {
        self.path.trim_matches('/')
    }

    /// The query a freshly mounted list starts from.
    pub fn initial_query(&self) -> QueryDescriptor {
        QueryDescriptor {
            filters: self.default_filters.clone(),
            ..QueryDescriptor::new(self.page_size)
        }
    }
}
