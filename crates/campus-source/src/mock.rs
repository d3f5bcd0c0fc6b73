//! In-memory data source.
//!
//! Stands in for the backend during development and in tests. Reads go
//! through the shared query engine, so list behaviour matches the remote
//! adapter exactly. Writes mimic a server: ids and `createdAt` are assigned
//! on create, unknown ids are reported as [`AdapterError::NotFound`].

use std::time::Duration;

use async_trait::async_trait;
use campus_model::{Fields, ItemId, ListItem, Page, QueryDescriptor, ResourceSpec};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::adapter::DataSourceAdapter;
use crate::engine::apply_query;
use crate::error::{AdapterError, Result};
use crate::normalize::{into_items, normalize_list};

/// Field stamped on created items.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Adapter backed by an in-memory collection.
#[derive(Debug)]
pub struct MockAdapter {
    resource: ResourceSpec,
    items: RwLock<Vec<ListItem>>,
    latency: Option<Duration>,
}

impl MockAdapter {
    /// Create an adapter over `items`.
    pub fn new(resource: ResourceSpec, items: Vec<ListItem>) -> Self {
        Self {
            resource,
            items: RwLock::new(items),
            latency: None,
        }
    }

    /// Create an adapter from fixture JSON in any shape the response
    /// normalizer accepts. Records without an id are dropped.
    pub fn from_json(resource: ResourceSpec, body: Value) -> Result<Self> {
        let envelope = normalize_list(body, &resource.name)?;
        let items = into_items(envelope.records);
        Ok(Self::new(resource, items))
    }

    /// Delay every call by `latency` to simulate a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    /// Copy of the whole collection.
    pub async fn snapshot(&self) -> Vec<ListItem> {
        self.items.read().await.clone()
    }

    /// Number of items in the collection.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the collection is empty.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DataSourceAdapter for MockAdapter {
    fn resource(&self) -> &ResourceSpec {
        &self.resource
    }

    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<Page> {
        self.simulate_latency().await;
        let items = self.items.read().await;
        let page = apply_query(&items, query, &self.resource.search_fields);
        debug!(
            resource = %self.resource.name,
            page = query.page,
            total = page.total,
            "mock fetch"
        );
        Ok(page)
    }

    async fn create(&self, mut payload: Fields) -> Result<ListItem> {
        self.simulate_latency().await;
        payload.remove("id");
        payload.remove("_id");
        payload
            .entry(CREATED_AT_FIELD)
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let item = ListItem::new(Uuid::new_v4().to_string(), payload);
        self.items.write().await.insert(0, item.clone());
        debug!(resource = %self.resource.name, id = %item.id, "mock create");
        Ok(item)
    }

    async fn update(&self, id: &ItemId, patch: Fields) -> Result<ListItem> {
        self.simulate_latency().await;
        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| AdapterError::NotFound { id: id.clone() })?;
        item.merge(&patch);
        debug!(resource = %self.resource.name, %id, "mock update");
        Ok(item.clone())
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        self.simulate_latency().await;
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| AdapterError::NotFound { id: id.clone() })?;
        items.remove(index);
        debug!(resource = %self.resource.name, %id, "mock delete");
        Ok(())
    }
}
