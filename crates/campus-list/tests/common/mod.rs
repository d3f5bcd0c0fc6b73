//! Shared fixtures for list controller tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use campus_model::{Fields, ItemId, ListItem, Page, QueryDescriptor, ResourceSpec};
use campus_source::{AdapterError, DataSourceAdapter, MockAdapter, Result};
use serde_json::json;

/// `count` courses with ids `c1..=cN`, alternating published/draft.
pub fn courses(count: usize) -> Vec<ListItem> {
    (1..=count)
        .map(|i| {
            ListItem::from_value(json!({
                "id": format!("c{i}"),
                "title": format!("Course {i}"),
                "status": if i % 2 == 0 { "published" } else { "draft" },
            }))
            .unwrap()
        })
        .collect()
}

pub fn course_resource() -> ResourceSpec {
    ResourceSpec::new("courses")
        .with_search_fields(["title"])
        .with_page_size(20)
        .with_default_filter("status", "all")
}

/// Mock adapter wrapper that counts calls and injects delays and failures.
pub struct ProbeAdapter {
    inner: MockAdapter,
    pub fetches: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_fetch: AtomicBool,
    fail_deletes: HashSet<ItemId>,
    page_delays: HashMap<usize, Duration>,
}

impl ProbeAdapter {
    pub fn new(count: usize) -> Self {
        Self {
            inner: MockAdapter::new(course_resource(), courses(count)),
            fetches: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            fail_fetch: AtomicBool::new(false),
            fail_deletes: HashSet::new(),
            page_delays: HashMap::new(),
        }
    }

    /// Delay fetches of `page` by `delay`.
    pub fn with_page_delay(mut self, page: usize, delay: Duration) -> Self {
        self.page_delays.insert(page, delay);
        self
    }

    /// Make deletes of `id` fail with a server error.
    pub fn with_failing_delete(mut self, id: &str) -> Self {
        self.fail_deletes.insert(ItemId::new(id));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub async fn stored(&self, id: &str) -> Option<ListItem> {
        self.inner
            .snapshot()
            .await
            .into_iter()
            .find(|item| item.id.as_str() == id)
    }
}

#[async_trait]
impl DataSourceAdapter for ProbeAdapter {
    fn resource(&self) -> &ResourceSpec {
        self.inner.resource()
    }

    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<Page> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.page_delays.get(&query.page) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AdapterError::Network("connection refused".to_string()));
        }
        self.inner.fetch_page(query).await
    }

    async fn create(&self, payload: Fields) -> Result<ListItem> {
        self.inner.create(payload).await
    }

    async fn update(&self, id: &ItemId, patch: Fields) -> Result<ListItem> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.contains(id) {
            return Err(AdapterError::Http {
                status: 500,
                body: "delete failed".to_string(),
            });
        }
        self.inner.delete(id).await
    }
}

pub fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
