//! The data source seam.

use async_trait::async_trait;
use campus_model::{Fields, ItemId, ListItem, Page, QueryDescriptor, ResourceSpec};

use crate::error::Result;

/// Translates queries and writes for one collection into a concrete backend.
///
/// Implementations keep no state between calls beyond the backing data:
/// no caching, no retries, no deduplication of identical requests. Every
/// implementation must apply search, filters, sort and pagination with the
/// semantics of [`crate::engine::apply_query`] so list screens behave the
/// same whichever adapter the configuration selects.
#[async_trait]
pub trait DataSourceAdapter: Send + Sync {
    /// Collection this adapter serves.
    fn resource(&self) -> &ResourceSpec;

    /// Fetch one page of items for `query`.
    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<Page>;

    /// Create an item; the backend assigns the id.
    async fn create(&self, payload: Fields) -> Result<ListItem>;

    /// Apply a partial update and return the stored item.
    async fn update(&self, id: &ItemId, patch: Fields) -> Result<ListItem>;

    /// Delete an item.
    async fn delete(&self, id: &ItemId) -> Result<()>;
}
