//! Result pages.

use serde::{Deserialize, Serialize};

use crate::item::{ItemId, ListItem};

/// Number of pages needed for `count` items.
///
/// Never zero: an empty collection still renders as "Page 1 of 1".
pub fn total_pages_for(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// One page of a collection plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Items on this page, in display order.
    pub items: Vec<ListItem>,
    /// Number of items matching the query across all pages.
    pub total: usize,
    /// 1-based page number these items belong to.
    pub page: usize,
    /// Number of pages for the query; at least 1.
    pub total_pages: usize,
}

impl Page {
    /// The degraded-read fallback: no items, page 1 of 1.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 1,
        }
    }

    /// Whether the page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item on this page by id.
    pub fn find(&self, id: &ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Find an item on this page by id, mutably.
    pub fn find_mut(&mut self, id: &ItemId) -> Option<&mut ListItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Remove an item from this page, returning it when present.
    ///
    /// `total` is decremented so the counter stays in step with the list.
    pub fn remove(&mut self, id: &ItemId) -> Option<ListItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        self.total = self.total.saturating_sub(1);
        Some(self.items.remove(index))
    }

    /// Ids of the items on this page, in display order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_pages_examples() {
        assert_eq!(total_pages_for(0, 20), 1);
        assert_eq!(total_pages_for(1, 20), 1);
        assert_eq!(total_pages_for(20, 20), 1);
        assert_eq!(total_pages_for(21, 20), 2);
        assert_eq!(total_pages_for(47, 20), 3);
    }

    #[test]
    fn test_empty_page() {
        let page = Page::empty();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }

    proptest! {
        #[test]
        fn total_pages_never_zero(count in 0usize..10_000, page_size in 0usize..200) {
            let pages = total_pages_for(count, page_size);
            prop_assert!(pages >= 1);
            prop_assert!(pages * page_size.max(1) >= count);
        }
    }
}
