//! Cursor-paginated review feed sequencer
//!
//! Sequences page fetches for one review list query, enforcing
//! at-most-one-fetch-in-flight and no-duplicate-cursor. The feed itself is
//! synchronous state with begin/complete/fail edges; the engine awaits the
//! transport between `begin_fetch` and the matching `complete`/`fail`.
//!
//! Changing filter/sort parameters resets pages and cursor to initial
//! values before the fresh first fetch; a reset also retires any in-flight
//! request via a generation check, so pages from different parameter sets
//! are never merged.

use tracing::debug;

use crate::model::{Cursor, PageRequest, Review, ReviewPage, ReviewQuery};

/// Ticket pairing an issued page request with the feed generation it
/// belongs to; completions presenting a retired generation are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTicket {
    generation: u64,
    pub request: PageRequest,
}

/// State of one cursor-paginated review list
#[derive(Debug)]
pub struct ReviewFeed {
    query: ReviewQuery,
    pages: Vec<ReviewPage>,
    cursor: Option<Cursor>,
    has_next: bool,
    is_fetching: bool,
    generation: u64,
}

impl ReviewFeed {
    pub fn new(query: ReviewQuery) -> Self {
        Self {
            query,
            pages: Vec::new(),
            cursor: None,
            has_next: true,
            is_fetching: false,
            generation: 0,
        }
    }

    pub fn query(&self) -> &ReviewQuery {
        &self.query
    }

    pub fn pages(&self) -> &[ReviewPage] {
        &self.pages
    }

    /// All loaded reviews in server-provided order; never re-sorted
    pub fn reviews(&self) -> impl Iterator<Item = &Review> {
        self.pages.iter().flat_map(|page| page.reviews.iter())
    }

    pub fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    /// Start the next page fetch
    ///
    /// No-op (returns `None`) while a fetch is in flight or the list is
    /// exhausted. Otherwise marks the feed fetching and returns the request
    /// carrying the current cursor - each issued request's cursor therefore
    /// differs from the previous one.
    pub fn begin_fetch(&mut self) -> Option<PageTicket> {
        if self.is_fetching || !self.has_next {
            return None;
        }
        self.is_fetching = true;
        Some(PageTicket {
            generation: self.generation,
            request: PageRequest {
                query: self.query.clone(),
                cursor: self.cursor.clone(),
            },
        })
    }

    /// Proximity trigger: a sentinel near the end of the rendered list
    /// became visible. Same gate as `begin_fetch`.
    pub fn notice_sentinel(&mut self, visible: bool) -> Option<PageTicket> {
        if !visible {
            return None;
        }
        self.begin_fetch()
    }

    /// Append a fetched page, preserving server order, and advance the
    /// cursor chain from the response's continuation token.
    ///
    /// Discarded when the ticket's generation was retired by a reset.
    pub fn complete(&mut self, ticket: PageTicket, page: ReviewPage) {
        if ticket.generation != self.generation {
            debug!(entity_id = %self.query.entity_id, "discarded page for retired query");
            return;
        }
        self.cursor = page.next_cursor.clone();
        self.has_next = page.next_cursor.is_some();
        self.pages.push(page);
        self.is_fetching = false;
    }

    /// Record a failed page fetch: fetching clears, cursor and `has_next`
    /// stay untouched so a subsequent trigger retries. No automatic retry.
    pub fn fail(&mut self, ticket: PageTicket) {
        if ticket.generation != self.generation {
            return;
        }
        self.is_fetching = false;
    }

    /// Replace the query parameters, dropping all accumulated pages and the
    /// cursor before the fresh first fetch.
    pub fn reset(&mut self, query: ReviewQuery) {
        self.query = query;
        self.pages.clear();
        self.cursor = None;
        self.has_next = true;
        self.is_fetching = false;
        self.generation += 1;
    }
}
