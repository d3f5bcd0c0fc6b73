//! Admin list screen state for Campus.
//!
//! [`ListPage`] ties a [`campus_source::DataSourceAdapter`] to the state a
//! list screen needs: [`ListQueryState`] for what is requested,
//! [`SelectionTracker`] for bulk actions and a [`CrudController`] that
//! reconciles create, update and delete results with the visible page.

pub mod confirm;
pub mod crud;
pub mod list_page;
pub mod query_state;
pub mod selection;

pub use confirm::{Confirm, ConfirmPrompt};
pub use crud::{
    BulkDeleteOutcome, BulkDeleteReport, CrudController, CrudError, CrudKind, DeleteOutcome,
};
pub use list_page::{FetchOutcome, FetchTicket, ListPage, ListView, LoadState, Row};
pub use query_state::ListQueryState;
pub use selection::SelectionTracker;
