//! Data sources for Campus list screens.
//!
//! A list screen never talks to a transport directly. It holds a
//! [`DataSourceAdapter`] chosen by configuration:
//!
//! - [`RemoteAdapter`]: the REST backend, with bearer auth and response
//!   shape normalization
//! - [`MockAdapter`]: an in-memory collection with the same query semantics
//!
//! Both run search, filters, sort and pagination through the shared
//! [`engine`], so switching adapters never changes what a screen shows.
//!
//! # Example
//!
//! ```
//! use campus_model::{QueryDescriptor, ResourceSpec};
//! use campus_source::{DataSourceAdapter, MockAdapter};
//! use serde_json::json;
//!
//! # async fn demo() -> campus_source::Result<()> {
//! let resource = ResourceSpec::new("courses").with_search_fields(["title"]);
//! let adapter = MockAdapter::from_json(
//!     resource,
//!     json!([{"id": "1", "title": "React Basics"}, {"id": "2", "title": "Vue Basics"}]),
//! )?;
//!
//! let page = adapter
//!     .fetch_page(&QueryDescriptor::new(20).with_search("react"))
//!     .await?;
//! assert_eq!(page.items.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod engine;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod remote;
pub mod session;

pub use adapter::DataSourceAdapter;
pub use engine::apply_query;
pub use error::{AdapterError, Result};
pub use mock::MockAdapter;
pub use normalize::{ListEnvelope, normalize_entity, normalize_list};
pub use remote::{DEFAULT_TIMEOUT, RemoteAdapter, RemoteConfig, UpdateMethod};
pub use session::SessionContext;
