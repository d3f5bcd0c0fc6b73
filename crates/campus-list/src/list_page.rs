//! List page controller.
//!
//! Owns the query state, the selection and the last applied [`Page`] for one
//! resource. Fetches are split into [`ListPage::begin_fetch`] and
//! [`ListPage::complete_fetch`] so a UI runtime can run the adapter call on
//! its own executor and route the result back as a message. Every begin
//! hands out a fresh request id; only the result carrying the latest id is
//! applied.

use std::sync::Arc;

use campus_model::{ItemId, ListItem, Page, QueryDescriptor, ResourceSpec};
use campus_source::{AdapterError, DataSourceAdapter};
use tracing::{debug, warn};

use crate::crud::CrudController;
use crate::query_state::ListQueryState;
use crate::selection::SelectionTracker;

/// Loading lifecycle of a list page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading { request_id: u64 },
    /// The last fetch was applied.
    Loaded,
    /// The last fetch failed; the page shows an empty result.
    Failed { message: String },
}

/// A fetch handed out by [`ListPage::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    request_id: u64,
    query: QueryDescriptor,
}

impl FetchTicket {
    /// Id compared against the latest fetch on completion.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Descriptor captured when the fetch began.
    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// Run the fetch against `adapter`.
    pub async fn run<A>(&self, adapter: &A) -> campus_source::Result<Page>
    where
        A: DataSourceAdapter + ?Sized,
    {
        adapter.fetch_page(&self.query).await
    }
}

/// What [`ListPage::complete_fetch`] did with a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was replaced.
    Applied,
    /// The fetch failed; the page was reset to empty.
    Failed(AdapterError),
    /// A newer fetch had begun; the result was discarded.
    Superseded,
}

impl FetchOutcome {
    /// Whether the page now shows this result.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    pub item: &'a ListItem,
    /// Row checkbox state.
    pub selected: bool,
}

/// Render snapshot of a list page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<'a> {
    pub rows: Vec<Row<'a>>,
    /// Header checkbox state.
    pub all_visible_selected: bool,
    /// Selected ids, all of them on the current page.
    pub selected_count: usize,
    /// 1-based page of the applied result.
    pub page: usize,
    pub total_pages: usize,
    /// Items matching the query across all pages.
    pub total: usize,
    pub state: &'a LoadState,
}

impl ListView<'_> {
    /// Pagination caption, e.g. `Page 2 of 3 (47 total)`.
    pub fn caption(&self) -> String {
        format!(
            "Page {} of {} ({} total)",
            self.page, self.total_pages, self.total
        )
    }
}

/// Controller for one admin list screen.
pub struct ListPage<A: ?Sized> {
    pub(crate) adapter: Arc<A>,
    pub(crate) query: ListQueryState,
    pub(crate) selection: SelectionTracker,
    pub(crate) page: Page,
    state: LoadState,
    latest_request: u64,
}

impl<A> ListPage<A>
where
    A: DataSourceAdapter + ?Sized,
{
    /// Idle page for the adapter's resource, with its default filters.
    pub fn new(adapter: Arc<A>) -> Self {
        let query = ListQueryState::new(adapter.resource());
        Self {
            adapter,
            query,
            selection: SelectionTracker::new(),
            page: Page::empty(),
            state: LoadState::Idle,
            latest_request: 0,
        }
    }

    /// Shared data source.
    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn resource(&self) -> &ResourceSpec {
        self.adapter.resource()
    }

    /// Current query state.
    pub fn query(&self) -> &ListQueryState {
        &self.query
    }

    /// Mutable query state. Callers refetch after mutating.
    pub fn query_mut(&mut self) -> &mut ListQueryState {
        &mut self.query
    }

    /// Selected ids.
    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionTracker {
        &mut self.selection
    }

    /// Last applied page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Loading lifecycle.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading { .. })
    }

    /// Ids on the current page, in display order.
    pub fn visible_ids(&self) -> Vec<ItemId> {
        self.page.ids()
    }

    /// Start a fetch for the current descriptor.
    ///
    /// Any fetch begun earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_request += 1;
        let request_id = self.latest_request;
        self.state = LoadState::Loading { request_id };
        debug!(
            resource = %self.adapter.resource().name,
            request_id,
            page = self.query.page(),
            "Fetching page"
        );
        FetchTicket {
            request_id,
            query: self.query.descriptor().clone(),
        }
    }

    /// Apply the result of `ticket` unless a newer fetch has begun.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: campus_source::Result<Page>,
    ) -> FetchOutcome {
        if ticket.request_id != self.latest_request {
            debug!(
                request_id = ticket.request_id,
                latest = self.latest_request,
                "Discarding superseded page"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                debug!(
                    request_id = ticket.request_id,
                    items = page.items.len(),
                    total = page.total,
                    "Page loaded"
                );
                self.query.set_total_pages(page.total_pages);
                self.page = page;
                self.state = LoadState::Loaded;
                FetchOutcome::Applied
            }
            Err(error) => {
                warn!(
                    resource = %self.adapter.resource().name,
                    request_id = ticket.request_id,
                    error = %error,
                    "Page fetch failed"
                );
                self.query.set_total_pages(1);
                self.query.set_page(1);
                self.page = Page::empty();
                self.state = LoadState::Failed {
                    message: error.user_message().to_string(),
                };
                FetchOutcome::Failed(error)
            }
        }
    }

    /// Fetch the current descriptor and apply it.
    pub async fn refresh(&mut self) -> FetchOutcome {
        let ticket = self.begin_fetch();
        let adapter = Arc::clone(&self.adapter);
        let result = ticket.run(adapter.as_ref()).await;
        self.complete_fetch(ticket, result)
    }

    /// Mutate the query and refetch.
    pub async fn update_query<F>(&mut self, mutate: F) -> FetchOutcome
    where
        F: FnOnce(&mut ListQueryState),
    {
        mutate(&mut self.query);
        self.refresh().await
    }

    /// CRUD operations that reconcile against this page.
    pub fn crud(&mut self) -> CrudController<'_, A> {
        CrudController::new(self)
    }

    /// Render snapshot. Selected ids no longer visible are dropped first.
    pub fn view(&mut self) -> ListView<'_> {
        let visible = self.page.ids();
        let pruned = self.selection.retain_visible(&visible);
        if pruned > 0 {
            debug!(pruned, "Dropped selection for rows no longer visible");
        }

        let rows = self
            .page
            .items
            .iter()
            .map(|item| Row {
                item,
                selected: self.selection.is_selected(&item.id),
            })
            .collect();

        ListView {
            rows,
            all_visible_selected: self.selection.is_all_visible_selected(&visible),
            selected_count: self.selection.len(),
            page: self.page.page,
            total_pages: self.page.total_pages,
            total: self.page.total,
            state: &self.state,
        }
    }
}

impl<A: ?Sized> std::fmt::Debug for ListPage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListPage")
            .field("query", &self.query)
            .field("selection", &self.selection)
            .field("page", &self.page)
            .field("state", &self.state)
            .field("latest_request", &self.latest_request)
            .finish_non_exhaustive()
    }
}
