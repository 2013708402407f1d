//! Search session controller
//!
//! Owns the pagination state for one gallery and drives the page model
//! through the new-search and load-more flows. Each flow is split into a
//! `begin_*` step that prepares the page and issues a [`FetchTicket`], and
//! [`SearchSession::complete`] which applies the fetch outcome. Outcomes for
//! tickets that have since been superseded are dropped.

use crate::api_client::{FetchError, ImageSearch, ResultPage};
use crate::page::PageModel;
use crate::pagination::{self, PAGE_SIZE};
use crate::render;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a search query!")]
    Empty,

    #[error("Search query must be at least {min} characters long!")]
    TooShort { min: usize },
}

/// Trim and check a submitted query
pub fn validate_query(raw: &str, min_len: usize) -> Result<String, ValidationError> {
    let query = raw.trim();
    if query.is_empty() {
        return Err(ValidationError::Empty);
    }
    if query.chars().count() < min_len {
        return Err(ValidationError::TooShort { min: min_len });
    }
    Ok(query.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub total_hits: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            total_hits: 0,
        }
    }
}

impl SearchState {
    pub fn reset(query: String) -> Self {
        Self {
            query,
            page: 1,
            total_hits: 0,
        }
    }

    pub fn total_pages(&self) -> u64 {
        pagination::total_pages(self.total_hits, PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Searching,
    Ready { has_more: bool },
    LoadingMore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    NewSearch,
    LoadMore,
}

/// Descriptor of one issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub kind: FetchKind,
    pub search_generation: u64,
    pub load_generation: u64,
    pub query: String,
    pub page: u32,
}

/// A finished fetch, as delivered back to the UI loop
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<ResultPage, FetchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

pub struct SearchSession<C: ImageSearch + ?Sized> {
    client: Arc<C>,
    state: SearchState,
    phase: SessionPhase,
    search_generation: u64,
    load_generation: u64,
    // Set after a failed load-more; the next activation re-requests the same page
    retry_pending: bool,
    min_query_len: usize,
}

impl<C: ImageSearch + ?Sized> SearchSession<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: SearchState::default(),
            phase: SessionPhase::Idle,
            search_generation: 0,
            load_generation: 0,
            retry_pending: false,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }

    /// Strict validation rejects queries shorter than two characters;
    /// lenient validation only rejects empty ones.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.min_query_len = if strict { DEFAULT_MIN_QUERY_LEN } else { 1 };
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn can_load_more(&self) -> bool {
        self.phase == SessionPhase::Ready { has_more: true }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Searching | SessionPhase::LoadingMore
        )
    }

    /// Validate the query and prepare the page for a fresh search
    ///
    /// Returns `None` when validation fails; a warning is shown and nothing
    /// else changes.
    pub fn begin_search(&mut self, page: &mut PageModel, raw_query: &str) -> Option<FetchTicket> {
        let query = match validate_query(raw_query, self.min_query_len) {
            Ok(query) => query,
            Err(err) => {
                debug!(target: "session", "Rejected query {:?}: {}", raw_query, err);
                page.toasts.warning("Warning", err.to_string());
                return None;
            }
        };

        self.search_generation += 1;
        self.load_generation = 0;
        self.retry_pending = false;
        self.state = SearchState::reset(query);
        self.phase = SessionPhase::Searching;
        info!(
            target: "session",
            "New search {:?} (generation {})",
            self.state.query,
            self.search_generation
        );

        render::clear(&mut page.gallery);
        page.lightbox.refresh(&page.gallery);
        page.viewport.offset = 0;
        if let Some(button) = page.load_more.as_mut() {
            button.restore();
        }
        render::set_visible(page.load_more.as_mut(), false);
        render::set_visible(page.loader.as_mut(), true);

        Some(self.ticket(FetchKind::NewSearch))
    }

    /// Advance to the next page if the gallery offers one
    pub fn begin_load_more(&mut self, page: &mut PageModel) -> Option<FetchTicket> {
        if !self.can_load_more() {
            debug!(target: "session", "Load more ignored in phase {:?}", self.phase);
            return None;
        }

        if !std::mem::take(&mut self.retry_pending) {
            self.state.page += 1;
        }
        self.load_generation += 1;
        self.phase = SessionPhase::LoadingMore;
        info!(
            target: "session",
            "Loading page {} of {:?}",
            self.state.page,
            self.state.query
        );

        if let Some(button) = page.load_more.as_mut() {
            button.set_busy();
        }
        render::set_visible(page.loader.as_mut(), true);

        Some(self.ticket(FetchKind::LoadMore))
    }

    fn ticket(&self, kind: FetchKind) -> FetchTicket {
        FetchTicket {
            kind,
            search_generation: self.search_generation,
            load_generation: self.load_generation,
            query: self.state.query.clone(),
            page: self.state.page,
        }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        if ticket.search_generation != self.search_generation {
            return false;
        }
        match ticket.kind {
            FetchKind::NewSearch => self.phase == SessionPhase::Searching,
            FetchKind::LoadMore => {
                ticket.load_generation == self.load_generation
                    && self.phase == SessionPhase::LoadingMore
            }
        }
    }

    /// Apply a fetch outcome to the session and the page
    pub fn complete(
        &mut self,
        page: &mut PageModel,
        ticket: FetchTicket,
        result: Result<ResultPage, FetchError>,
    ) -> Applied {
        if !self.is_current(&ticket) {
            debug!(
                target: "session",
                "Discarding stale {:?} outcome for {:?} page {}",
                ticket.kind,
                ticket.query,
                ticket.page
            );
            return Applied::Stale;
        }

        match ticket.kind {
            FetchKind::NewSearch => self.finish_search(page, result),
            FetchKind::LoadMore => self.finish_load_more(page, result),
        }
        Applied::Applied
    }

    fn finish_search(&mut self, page: &mut PageModel, result: Result<ResultPage, FetchError>) {
        render::set_visible(page.loader.as_mut(), false);

        match result {
            Ok(results) => {
                self.state.total_hits = results.total_hits;
                render::append_cards(&mut page.gallery, &results.items);
                page.lightbox.refresh(&page.gallery);
                page.toasts.success(
                    "Success",
                    format!("Found {} images!", results.total_hits),
                );

                let has_more =
                    pagination::has_more(self.state.page, self.state.total_hits, PAGE_SIZE);
                render::set_visible(page.load_more.as_mut(), has_more);
                self.phase = SessionPhase::Ready { has_more };
                info!(
                    target: "session",
                    "Rendered {} cards, {} total hits, more pages: {}",
                    results.items.len(),
                    self.state.total_hits,
                    has_more
                );
            }
            Err(FetchError::NoResults) => {
                page.toasts.info(
                    "No Results",
                    "Sorry, there are no images matching your search query. Please try again!",
                );
                self.phase = SessionPhase::Idle;
                info!(target: "session", "No results for {:?}", self.state.query);
            }
            Err(err) => {
                page.toasts
                    .error("Error", "Something went wrong. Please try again later.");
                self.phase = SessionPhase::Idle;
                warn!(target: "session", "Error fetching images: {}", err);
            }
        }

        page.form.reset();
    }

    fn finish_load_more(&mut self, page: &mut PageModel, result: Result<ResultPage, FetchError>) {
        render::set_visible(page.loader.as_mut(), false);

        match result {
            Ok(results) => {
                render::append_cards(&mut page.gallery, &results.items);
                page.lightbox.refresh(&page.gallery);
                render::scroll_to_new_content(&mut page.viewport, page.card_height);

                let has_more =
                    pagination::has_more(self.state.page, self.state.total_hits, PAGE_SIZE);
                if let Some(button) = page.load_more.as_mut() {
                    button.restore();
                }
                render::set_visible(page.load_more.as_mut(), has_more);
                if !has_more {
                    page.toasts.info(
                        "End of Results",
                        "We're sorry, but you've reached the end of search results.",
                    );
                }
                self.phase = SessionPhase::Ready { has_more };
                info!(
                    target: "session",
                    "Appended {} cards (page {}/{})",
                    results.items.len(),
                    self.state.page,
                    self.state.total_pages()
                );
            }
            Err(err) => {
                if let Some(button) = page.load_more.as_mut() {
                    button.restore();
                }
                render::set_visible(page.load_more.as_mut(), true);
                page.toasts
                    .error("Error", "Failed to load more images. Please try again.");
                self.phase = SessionPhase::Ready { has_more: true };
                self.retry_pending = true;
                warn!(
                    target: "session",
                    "Error loading page {}: {}",
                    self.state.page,
                    err
                );
            }
        }
    }

    /// Run the fetch a ticket describes
    pub async fn fetch(&self, ticket: &FetchTicket) -> Result<ResultPage, FetchError> {
        self.client
            .fetch_results(&ticket.query, ticket.page, PAGE_SIZE)
            .await
    }

    /// Submit a query and wait for its first page
    ///
    /// `None` means no fetch was issued.
    pub async fn submit_search(&mut self, page: &mut PageModel, raw_query: &str) -> Option<Applied> {
        let ticket = self.begin_search(page, raw_query)?;
        let result = self.fetch(&ticket).await;
        Some(self.complete(page, ticket, result))
    }

    /// Activate load-more and wait for the next page
    pub async fn load_more(&mut self, page: &mut PageModel) -> Option<Applied> {
        let ticket = self.begin_load_more(page)?;
        let result = self.fetch(&ticket).await;
        Some(self.complete(page, ticket, result))
    }
}

impl<C: ImageSearch + ?Sized + 'static> SearchSession<C> {
    /// Run a ticket's fetch on the runtime and post the outcome to `tx`
    pub fn spawn_fetch(&self, ticket: FetchTicket, tx: UnboundedSender<FetchOutcome>) {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client
                .fetch_results(&ticket.query, ticket.page, PAGE_SIZE)
                .await;
            if tx.send(FetchOutcome { ticket, result }).is_err() {
                debug!(target: "session", "UI loop gone, dropping fetch outcome");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query("  ", 2), Err(ValidationError::Empty));
        assert_eq!(validate_query("", 1), Err(ValidationError::Empty));
        assert_eq!(
            validate_query(" a ", 2),
            Err(ValidationError::TooShort { min: 2 })
        );
        assert_eq!(validate_query(" a ", 1), Ok("a".to_string()));
        assert_eq!(validate_query("  cats ", 2), Ok("cats".to_string()));
        assert_eq!(validate_query("猫犬", 2), Ok("猫犬".to_string()));
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::TooShort { min: 2 }.to_string(),
            "Search query must be at least 2 characters long!"
        );
        assert_eq!(
            ValidationError::Empty.to_string(),
            "Please enter a search query!"
        );
    }

    #[test]
    fn test_state_reset() {
        let state = SearchState::reset("dogs".to_string());
        assert_eq!(state.page, 1);
        assert_eq!(state.total_hits, 0);
        assert_eq!(state.total_pages(), 0);
    }
}
