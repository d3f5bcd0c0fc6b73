//! REST data source.
//!
//! Speaks the backend contract:
//!
//! ```text
//! GET    /<resource>?page=&limit=&search=&<filter>=&sortBy=&order=
//! POST   /<resource>          body = fields          -> created entity
//! PATCH  /<resource>/<id>     body = partial fields  -> updated entity
//! DELETE /<resource>/<id>                            -> 2xx, empty body
//! ```
//!
//! Every request carries `Authorization: Bearer <token>` when the session
//! holds one. A `401` expires the session, which notifies the forced-logout
//! subscriber.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use campus_model::{Fields, ItemId, ListItem, Page, QueryDescriptor, ResourceSpec};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::adapter::DataSourceAdapter;
use crate::error::{AdapterError, Result};
use crate::normalize::{normalize_entity, normalize_list, page_from_envelope};
use crate::session::SessionContext;

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("campus-admin/", env!("CARGO_PKG_VERSION"));

/// HTTP method used for partial updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMethod {
    /// `PATCH /<resource>/<id>`
    #[default]
    Patch,
    /// `PUT /<resource>/<id>`
    Put,
}

/// Connection settings shared by every remote collection.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// API base URL, e.g. `https://api.example.com/api`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Method used by [`DataSourceAdapter::update`].
    pub update_method: UpdateMethod,
}

impl RemoteConfig {
    /// Settings for `base_url` with the default timeout and `PATCH` updates.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            update_method: UpdateMethod::default(),
        }
    }
}

/// Adapter for one collection of the REST backend.
#[derive(Debug, Clone)]
pub struct RemoteAdapter {
    client: Client,
    base_url: Url,
    resource: ResourceSpec,
    session: Arc<SessionContext>,
    update_method: UpdateMethod,
}

impl RemoteAdapter {
    /// Create an adapter for `resource`.
    pub fn new(
        config: &RemoteConfig,
        resource: ResourceSpec,
        session: Arc<SessionContext>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AdapterError::Config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AdapterError::Config(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdapterError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            resource,
            session,
            update_method: config.update_method,
        })
    }

    /// URL of the collection.
    pub fn collection_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| AdapterError::Config("base URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            segments.extend(
                self.resource
                    .trimmed_path()
                    .split('/')
                    .filter(|segment| !segment.is_empty()),
            );
        }
        Ok(url)
    }

    /// URL of one item; the id is percent-encoded as a single segment.
    pub fn item_url(&self, id: &ItemId) -> Result<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| AdapterError::Config("base URL cannot carry a path".to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    /// URL of a list request for `query`.
    pub fn list_url(&self, query: &QueryDescriptor) -> Result<Url> {
        let mut url = self.collection_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("limit", &query.page_size.to_string());
            if let Some(term) = query.search_term() {
                pairs.append_pair("search", term);
            }
            for (key, value) in query.active_filters() {
                pairs.append_pair(key, value);
            }
            if let Some(sort) = &query.sort_by {
                pairs.append_pair("sortBy", &sort.field);
                pairs.append_pair("order", sort.direction.as_str());
            }
        }
        Ok(url)
    }

    /// Attach credentials, send, and map non-success statuses to errors.
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.session.expire();
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(resource = %self.resource.name, %status, "request failed");
            return Err(AdapterError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Read a JSON body; an empty body reads as `null`.
    async fn read_json(response: Response) -> Result<Value> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl DataSourceAdapter for RemoteAdapter {
    fn resource(&self) -> &ResourceSpec {
        &self.resource
    }

    async fn fetch_page(&self, query: &QueryDescriptor) -> Result<Page> {
        let url = self.list_url(query)?;
        debug!(resource = %self.resource.name, %url, "fetching page");

        let response = self.send(self.client.get(url)).await?;
        let body = Self::read_json(response).await?;
        let envelope = normalize_list(body, &self.resource.name)?;
        Ok(page_from_envelope(
            envelope,
            query,
            &self.resource.search_fields,
        ))
    }

    async fn create(&self, payload: Fields) -> Result<ListItem> {
        let url = self.collection_url()?;
        let response = self
            .send(self.client.post(url).json(&Value::Object(payload)))
            .await?;
        let body = Self::read_json(response).await?;
        let item = ListItem::from_value(normalize_entity(body))?;
        info!(resource = %self.resource.name, id = %item.id, "created item");
        Ok(item)
    }

    async fn update(&self, id: &ItemId, patch: Fields) -> Result<ListItem> {
        let url = self.item_url(id)?;
        let request = match self.update_method {
            UpdateMethod::Patch => self.client.patch(url),
            UpdateMethod::Put => self.client.put(url),
        };
        let response = self
            .send(request.json(&Value::Object(patch.clone())))
            .await?;
        let body = Self::read_json(response).await?;
        info!(resource = %self.resource.name, %id, "updated item");

        // A 204 echoes nothing back; the patch is all that is known.
        if body.is_null() {
            return Ok(ListItem::new(id.clone(), patch));
        }
        Ok(ListItem::from_value(normalize_entity(body))?)
    }

    async fn delete(&self, id: &ItemId) -> Result<()> {
        let url = self.item_url(id)?;
        self.send(self.client.delete(url)).await?;
        info!(resource = %self.resource.name, %id, "deleted item");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_model::SortSpec;

    fn adapter(base_url: &str, path: &str) -> RemoteAdapter {
        RemoteAdapter::new(
            &RemoteConfig::new(base_url),
            ResourceSpec::new("courses").with_path(path),
            Arc::new(SessionContext::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_list_url() {
        let adapter = adapter("https://api.example.com/api/", "/courses");
        let query = QueryDescriptor::new(20)
            .with_page(2)
            .with_search("react basics")
            .with_filter("status", "all")
            .with_filter("level", "beginner")
            .with_sort(SortSpec::desc("createdAt"));

        insta::assert_snapshot!(
            adapter.list_url(&query).unwrap().as_str(),
            @"https://api.example.com/api/courses?page=2&limit=20&search=react+basics&level=beginner&sortBy=createdAt&order=desc"
        );
    }

    #[test]
    fn test_list_url_skips_reserved_filters_and_trims_values() {
        let adapter = adapter("https://api.example.com/api", "courses");
        let query = QueryDescriptor::new(20)
            .with_filter("limit", "5")
            .with_filter("page", "9")
            .with_filter("status", " published ");

        assert_eq!(
            adapter.list_url(&query).unwrap().as_str(),
            "https://api.example.com/api/courses?page=1&limit=20&status=published"
        );
    }

    #[test]
    fn test_item_url_encodes_id() {
        let adapter = adapter("https://api.example.com", "admin/courses");
        let url = adapter.item_url(&ItemId::new("a b/c")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/admin/courses/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RemoteAdapter::new(
            &RemoteConfig::new("not a url"),
            ResourceSpec::new("courses"),
            Arc::new(SessionContext::new()),
        )
        .unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));

        let err = RemoteAdapter::new(
            &RemoteConfig::new("mailto:admin@example.com"),
            ResourceSpec::new("courses"),
            Arc::new(SessionContext::new()),
        )
        .unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));
    }
}
