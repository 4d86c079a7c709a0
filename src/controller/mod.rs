//! Collection page controller
//!
//! Drives the paginated book list: fetching pages, moving between them and
//! refreshing after add/edit/delete. Every fetch gets a generation number and
//! only the most recently issued one may replace the displayed page.

use log::debug;
use std::sync::Arc;

use crate::client::models::{Book, CreateBookRequest};
use crate::client::{BookApi, DEFAULT_PAGE_SIZE, Page, PageRequest};
use crate::error::Result;
use crate::forms::BookForm;

pub const FETCH_FAILED: &str = "Failed to fetch books. Please try again later.";
pub const ADD_FAILED: &str = "Failed to add book. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update book. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete book. Please try again.";

/// Sort applied to every list request unless configured otherwise
pub const DEFAULT_SORT: &str = "title,asc";

/// Where the list currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight; the previous page stays visible
    Loading { previous: Option<Page<Book>> },
    Loaded(Page<Book>),
    /// The last fetch failed; the last good page, if any, stays visible
    Failed {
        message: String,
        last_good: Option<Page<Book>>,
    },
}

impl ListState {
    /// The page to show, whether fresh or stale.
    pub fn page(&self) -> Option<&Page<Book>> {
        match self {
            ListState::Idle => None,
            ListState::Loading { previous } => previous.as_ref(),
            ListState::Loaded(page) => Some(page),
            ListState::Failed { last_good, .. } => last_good.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ListState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn into_page(self) -> Option<Page<Book>> {
        match self {
            ListState::Idle => None,
            ListState::Loading { previous } => previous,
            ListState::Loaded(page) => Some(page),
            ListState::Failed { last_good, .. } => last_good,
        }
    }
}

/// Handle for one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: PageRequest,
}

impl FetchTicket {
    pub fn request(&self) -> &PageRequest {
        &self.request
    }
}

/// Result of an edit submission.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The draft matched the original; no request was sent
    NothingToUpdate,
    Updated(Book),
}

/// Page number and size to load after deleting from `page`.
///
/// Removing the only item of a non-first page steps back one page so the
/// list never lands on an empty trailing page.
pub fn refetch_target_after_delete(page: &Page<Book>) -> (usize, usize) {
    if page.content.len() == 1 && page.number > 0 {
        (page.number - 1, page.size)
    } else {
        (page.number, page.size)
    }
}

pub struct BookListController<C: BookApi> {
    client: Arc<C>,
    sort: String,
    default_size: usize,
    state: ListState,
    generation: u64,
}

impl<C: BookApi> BookListController<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            sort: DEFAULT_SORT.to_string(),
            default_size: DEFAULT_PAGE_SIZE,
            state: ListState::Idle,
            generation: 0,
        }
    }

    /// Override the sort expression sent with every list request.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Page size used before any page has been loaded.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.default_size = size;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// The page on screen, possibly stale.
    pub fn current_page(&self) -> Option<&Page<Book>> {
        self.state.page()
    }

    fn current_position(&self) -> (usize, usize) {
        self.current_page()
            .map(|p| (p.number, p.size))
            .unwrap_or((0, self.default_size))
    }

    fn current_size(&self) -> usize {
        self.current_position().1
    }

    /// Enter `Loading` and hand out the ticket for a new request.
    ///
    /// Issuing a ticket supersedes every earlier one.
    pub fn begin_fetch(&mut self, page: usize, size: usize) -> FetchTicket {
        self.generation += 1;
        let previous = std::mem::replace(&mut self.state, ListState::Idle).into_page();
        self.state = ListState::Loading { previous };

        FetchTicket {
            generation: self.generation,
            request: PageRequest::new(page, size).sort(self.sort.clone()),
        }
    }

    /// Apply the response for `ticket`.
    ///
    /// Returns false, leaving the state alone, when a newer fetch has been
    /// issued since.
    pub fn finish_fetch(&mut self, ticket: &FetchTicket, result: &Result<Page<Book>>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale page {} response (generation {} < {})",
                ticket.request.page, ticket.generation, self.generation
            );
            return false;
        }

        let previous = std::mem::replace(&mut self.state, ListState::Idle).into_page();
        self.state = match result {
            Ok(page) => ListState::Loaded(page.clone()),
            Err(err) => {
                debug!("Fetching page {} failed: {}", ticket.request.page, err);
                ListState::Failed {
                    message: err.user_message(FETCH_FAILED),
                    last_good: previous,
                }
            }
        };
        true
    }

    /// Load one page, replacing the displayed page on success.
    ///
    /// On failure the state moves to `Failed` with the previous page kept and
    /// the error is also returned.
    pub async fn fetch_page(&mut self, page: usize, size: usize) -> Result<()> {
        let ticket = self.begin_fetch(page, size);
        let result = self.client.list_books(ticket.request()).await;
        self.finish_fetch(&ticket, &result);
        result.map(|_| ())
    }

    /// Reload after a successful mutation; a failure stays in the state only.
    async fn refresh(&mut self, page: usize, size: usize) {
        if let Err(err) = self.fetch_page(page, size).await {
            debug!("Refresh after mutation failed: {}", err);
        }
    }

    /// Move forward one page; `Ok(false)` when already on the last page.
    pub async fn go_to_next_page(&mut self) -> Result<bool> {
        let Some(page) = self.current_page() else {
            return Ok(false);
        };
        if !page.has_next() {
            return Ok(false);
        }
        let (number, size) = (page.number + 1, page.size);
        self.fetch_page(number, size).await?;
        Ok(true)
    }

    /// Move back one page; `Ok(false)` when already on the first page.
    pub async fn go_to_previous_page(&mut self) -> Result<bool> {
        let Some(page) = self.current_page() else {
            return Ok(false);
        };
        if !page.has_previous() || page.number == 0 {
            return Ok(false);
        }
        let (number, size) = (page.number - 1, page.size);
        self.fetch_page(number, size).await?;
        Ok(true)
    }

    /// Delete a book and reload the page it was on.
    ///
    /// A failed delete leaves the displayed page untouched and sends no
    /// follow-up request.
    pub async fn delete_record(&mut self, id: i64) -> Result<()> {
        self.client.delete_book(id).await?;

        let (number, size) = match self.current_page() {
            Some(page) => refetch_target_after_delete(page),
            None => (0, self.default_size),
        };
        debug!("Deleted book {}; refetching page {} (size {})", id, number, size);

        self.refresh(number, size).await;
        Ok(())
    }

    /// Validate and create a book, then show the first page.
    pub async fn add_record(&mut self, form: &BookForm) -> Result<Book> {
        let request: CreateBookRequest = form.validate()?;
        let book = self.client.create_book(&request).await?;

        let size = self.current_size();
        self.refresh(0, size).await;
        Ok(book)
    }

    /// Send only the fields of `form` that differ from `original`.
    ///
    /// An empty diff makes no request at all.
    pub async fn update_record(&mut self, original: &Book, form: &BookForm) -> Result<UpdateOutcome> {
        let changes = form.diff_against(original)?;
        if changes.is_empty() {
            debug!("No changes to book {}", original.id);
            return Ok(UpdateOutcome::NothingToUpdate);
        }

        debug!(
            "Updating book {} fields: {}",
            original.id,
            changes.changed_fields().join(", ")
        );
        let book = self.client.update_book(original.id, &changes).await?;

        let (number, size) = self.current_position();
        self.refresh(number, size).await;
        Ok(UpdateOutcome::Updated(book))
    }
}
