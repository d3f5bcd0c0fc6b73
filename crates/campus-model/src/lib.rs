//! Data model for the Campus back-office list screens.
//!
//! Every admin collection (courses, programs, users, blog posts, bootcamps,
//! reports, tasks, submissions, tutors) is handled through the same shapes:
//!
//! - [`item`]: [`ListItem`] rows keyed by a stable [`ItemId`]
//! - [`query`]: the [`QueryDescriptor`] that drives a fetch
//! - [`page`]: one [`Page`] of results plus pagination metadata
//! - [`form`]: [`FieldSpec`] descriptions used by form validation
//! - [`resource`]: [`ResourceSpec`] list configuration for one collection
//!
//! # Example
//!
//! ```
//! use campus_model::{QueryDescriptor, total_pages_for};
//!
//! let query = QueryDescriptor::new(20);
//! assert_eq!(query.page, 1);
//! assert_eq!(total_pages_for(47, query.page_size), 3);
//! assert_eq!(total_pages_for(0, query.page_size), 1);
//! ```

pub mod error;
pub mod form;
pub mod item;
pub mod page;
pub mod query;
pub mod resource;

pub use error::{ModelError, Result};
pub use form::{FieldKind, FieldSpec, SelectOption};
pub use item::{Fields, ItemId, ListItem};
pub use page::{Page, total_pages_for};
pub use query::{
    DEFAULT_PAGE_SIZE, FILTER_ALL, QueryDescriptor, RESERVED_FILTER_KEYS, SortDirection, SortSpec,
    is_active_filter,
};
pub use resource::ResourceSpec;
