//! Create, update and delete against a list page.
//!
//! Each operation calls the adapter first and only touches the local page
//! after the call succeeds, so a failure leaves the list as it was.

use std::fmt;

use campus_model::{Fields, ItemId, ListItem};
use campus_source::{AdapterError, DataSourceAdapter};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::confirm::{Confirm, ConfirmPrompt};
use crate::list_page::ListPage;

/// Which CRUD operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudKind {
    Create,
    Update,
    Delete,
}

impl CrudKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for CrudKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed CRUD operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} failed: {cause}")]
pub struct CrudError {
    pub kind: CrudKind,
    #[source]
    pub cause: AdapterError,
}

impl CrudError {
    pub fn new(kind: CrudKind, cause: AdapterError) -> Self {
        Self { kind, cause }
    }

    /// Text suitable for an error toast.
    pub fn user_message(&self) -> String {
        format!("Could not {} the item. {}", self.kind, self.cause.user_message())
    }
}

pub type Result<T> = std::result::Result<T, CrudError>;

/// Result of a single delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; no request was sent.
    Aborted,
}

/// Per-item results of a bulk delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<ItemId>,
    pub failed: Vec<(ItemId, CrudError)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of deleting the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    /// Nothing was selected.
    Empty,
    /// The user declined; no request was sent.
    Aborted,
    Completed(BulkDeleteReport),
}

/// CRUD operations bound to one [`ListPage`].
pub struct CrudController<'a, A: ?Sized> {
    list: &'a mut ListPage<A>,
}

impl<'a, A> CrudController<'a, A>
where
    A: DataSourceAdapter + ?Sized,
{
    pub(crate) fn new(list: &'a mut ListPage<A>) -> Self {
        Self { list }
    }

    /// Create an item, then refetch the current descriptor.
    ///
    /// The server decides where the new item lands, so it is not inserted
    /// locally.
    pub async fn create(&mut self, payload: Fields) -> Result<ListItem> {
        let created = self
            .list
            .adapter
            .create(payload)
            .await
            .map_err(|error| CrudError::new(CrudKind::Create, error))?;
        info!(
            resource = %self.list.resource().name,
            id = %created.id,
            "Item created"
        );
        self.list.refresh().await;
        Ok(created)
    }

    /// Update an item and merge the patch into the local row.
    ///
    /// An item not on the current page is updated remotely only.
    pub async fn update(&mut self, id: &ItemId, patch: Fields) -> Result<ListItem> {
        let stored = self
            .list
            .adapter
            .update(id, patch.clone())
            .await
            .map_err(|error| CrudError::new(CrudKind::Update, error))?;

        match self.list.page.find_mut(id) {
            Some(item) => item.merge(&patch),
            None => debug!(%id, "Updated item is not on the current page"),
        }
        info!(resource = %self.list.resource().name, %id, "Item updated");
        Ok(stored)
    }

    /// Delete one item after confirmation.
    pub async fn delete(
        &mut self,
        id: &ItemId,
        mut confirm: impl Confirm,
    ) -> Result<DeleteOutcome> {
        let prompt = ConfirmPrompt::delete(self.list.resource().name.clone(), vec![id.clone()]);
        if !confirm.confirm(&prompt) {
            debug!(%id, "Delete declined");
            return Ok(DeleteOutcome::Aborted);
        }

        self.list
            .adapter
            .delete(id)
            .await
            .map_err(|error| CrudError::new(CrudKind::Delete, error))?;
        self.forget(id);
        info!(resource = %self.list.resource().name, %id, "Item deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Delete every selected item after one confirmation.
    ///
    /// Items are deleted one by one. Failures are collected; the failed ids
    /// stay on the page and stay selected.
    pub async fn delete_selected(&mut self, mut confirm: impl Confirm) -> BulkDeleteOutcome {
        let ids: Vec<ItemId> = self.list.selection.ids().cloned().collect();
        if ids.is_empty() {
            return BulkDeleteOutcome::Empty;
        }

        let prompt = ConfirmPrompt::delete(self.list.resource().name.clone(), ids.clone());
        if !confirm.confirm(&prompt) {
            debug!(count = ids.len(), "Bulk delete declined");
            return BulkDeleteOutcome::Aborted;
        }

        let mut report = BulkDeleteReport::default();
        for id in ids {
            match self.list.adapter.delete(&id).await {
                Ok(()) => {
                    self.forget(&id);
                    report.deleted.push(id);
                }
                Err(error) => {
                    warn!(%id, error = %error, "Bulk delete item failed");
                    report.failed.push((id, CrudError::new(CrudKind::Delete, error)));
                }
            }
        }
        info!(
            resource = %self.list.resource().name,
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "Bulk delete finished"
        );
        BulkDeleteOutcome::Completed(report)
    }

    fn forget(&mut self, id: &ItemId) {
        self.list.page.remove(id);
        self.list.selection.remove(id);
    }
}
