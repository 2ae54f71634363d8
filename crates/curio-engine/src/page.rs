//! Entity detail page session
//!
//! One instance per rendered detail page. Holds the injected cache handle,
//! the transport, the review feed, and the notice log; exposes the loading,
//! paging, and mutation entry points the page invokes, plus the render
//! state derived from cache + session + route.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use curio_core::cache::{CacheKey, CacheValue, RemoteCache};
use curio_core::feed::{PageTicket, ReviewFeed};
use curio_core::model::{
    Entity, EntityRoute, Review, ReviewFilters, ReviewQuery, ReviewSort, Session,
};
use curio_core::mutation::{MutationAction, MutationOutcome, ReportReason};
use curio_core::notify::NoticeLog;
use curio_core::queries::view_gate::{self, RenderState};
use curio_core::{log_op_end, log_op_error, log_op_start};

use crate::coordinator::run_mutation;
use crate::transport::{fetch_error, Transport};

/// Synchronization session backing one entity detail page
pub struct EntityPageSession {
    cache: Rc<RemoteCache>,
    transport: Rc<dyn Transport>,
    notices: NoticeLog,
    feed: RefCell<ReviewFeed>,
    session: Session,
    route: EntityRoute,
}

impl EntityPageSession {
    /// Construct with an explicitly injected cache instance
    ///
    /// The cache is shared with whatever else on the page reads it; there
    /// is deliberately no ambient global.
    pub fn new(
        cache: Rc<RemoteCache>,
        transport: Rc<dyn Transport>,
        session: Session,
        route: EntityRoute,
    ) -> Self {
        let feed = ReviewFeed::new(ReviewQuery::new(route.id));
        Self {
            cache,
            transport,
            notices: NoticeLog::new(),
            feed: RefCell::new(feed),
            session,
            route,
        }
    }

    pub fn cache(&self) -> &RemoteCache {
        &self.cache
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// Snapshot of the cached entity, if settled present
    pub fn entity(&self) -> Option<Entity> {
        self.cache
            .read(CacheKey::Entity(self.route.id))
            .and_then(CacheValue::into_entity)
    }

    /// Reviews loaded so far, cloned in server order
    pub fn reviews(&self) -> Vec<Review> {
        self.feed.borrow().reviews().cloned().collect()
    }

    /// Which of the five exclusive branches the page renders right now
    ///
    /// Stateless: re-evaluate after any cache change notification.
    pub fn render_state(&self) -> RenderState {
        let entity = self.entity();
        view_gate::resolve(
            &self.session,
            self.route.flags,
            self.cache.fetch_state(CacheKey::Entity(self.route.id)),
            entity.as_ref(),
        )
    }

    /// Initial page load: entity and favorite memberships read-through,
    /// then the first review page.
    pub async fn load(&self) {
        self.ensure_entity().await;
        self.ensure_favorites().await;
        self.fetch_next_reviews().await;
    }

    /// Read-through fetch of the entity unless a fresh settled value exists
    pub async fn ensure_entity(&self) {
        let key = CacheKey::Entity(self.route.id);
        let Some(ticket) = self.cache.begin_fetch(key) else {
            return;
        };
        let started = Instant::now();
        log_op_start!("fetch_entity", entity_id = %self.route.id);
        match self.transport.entity_by_id(self.route.id).await {
            Ok(outcome) => {
                self.cache
                    .complete_fetch(ticket, outcome.map(CacheValue::Entity));
                log_op_end!(
                    "fetch_entity",
                    duration_ms = started.elapsed().as_millis() as u64,
                    entity_id = %self.route.id
                );
            }
            Err(err) => {
                self.cache.fail_fetch(ticket);
                let err = fetch_error(err);
                self.notices.failure(err.to_string());
                log_op_error!(
                    "fetch_entity",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
    }

    /// Read-through fetch of the favorite membership set; anonymous
    /// sessions have none, so the fetch is skipped entirely.
    pub async fn ensure_favorites(&self) {
        if !self.session.is_signed_in() {
            return;
        }
        let Some(ticket) = self.cache.begin_fetch(CacheKey::Favorites) else {
            return;
        };
        let started = Instant::now();
        match self.transport.favorite_memberships().await {
            Ok(members) => {
                self.cache
                    .complete_fetch(ticket, Some(CacheValue::Favorites(members)));
            }
            Err(err) => {
                self.cache.fail_fetch(ticket);
                let err = fetch_error(err);
                self.notices.failure(err.to_string());
                log_op_error!(
                    "fetch_favorites",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
            }
        }
    }

    /// Fetch the next review page; no-op while a fetch is in flight or the
    /// list is exhausted. Returns whether a page was appended.
    pub async fn fetch_next_reviews(&self) -> bool {
        let ticket = self.feed.borrow_mut().begin_fetch();
        match ticket {
            Some(ticket) => self.run_page_fetch(ticket).await,
            None => false,
        }
    }

    /// Proximity trigger from the sentinel near the end of the list
    pub async fn on_sentinel_visible(&self, visible: bool) -> bool {
        let ticket = self.feed.borrow_mut().notice_sentinel(visible);
        match ticket {
            Some(ticket) => self.run_page_fetch(ticket).await,
            None => false,
        }
    }

    /// Change review filter/sort parameters: drop accumulated pages and
    /// fetch the first page of the new query.
    pub async fn change_review_query(&self, sort: ReviewSort, filters: ReviewFilters) {
        let query = ReviewQuery {
            entity_id: self.route.id,
            sort,
            filters,
        };
        self.feed.borrow_mut().reset(query);
        self.fetch_next_reviews().await;
    }

    async fn run_page_fetch(&self, ticket: PageTicket) -> bool {
        let started = Instant::now();
        log_op_start!("fetch_reviews", entity_id = %self.route.id);
        let response = self.transport.reviews(&ticket.request).await;
        match response {
            Ok(page) => {
                let appended = page.reviews.len();
                self.feed.borrow_mut().complete(ticket, page);
                log_op_end!(
                    "fetch_reviews",
                    duration_ms = started.elapsed().as_millis() as u64,
                    page_len = appended
                );
                true
            }
            Err(err) => {
                self.feed.borrow_mut().fail(ticket);
                let err = fetch_error(err);
                self.notices.failure(err.to_string());
                log_op_error!(
                    "fetch_reviews",
                    err,
                    duration_ms = started.elapsed().as_millis() as u64
                );
                false
            }
        }
    }

    /// Flip favorite membership optimistically; reconciles on settlement
    pub async fn toggle_favorite(&self) -> MutationOutcome {
        let action = MutationAction::ToggleFavorite {
            entity_id: self.route.id,
        };
        run_mutation(
            &self.cache,
            &self.notices,
            &action,
            self.transport.toggle_favorite(self.route.id),
        )
        .await
    }

    /// Report the entity; no optimistic patch, success gets a notice
    pub async fn report(&self, reason: ReportReason) -> MutationOutcome {
        let action = MutationAction::ReportEntity {
            entity_id: self.route.id,
            reason,
        };
        let outcome = run_mutation(
            &self.cache,
            &self.notices,
            &action,
            self.transport.report_entity(self.route.id, reason),
        )
        .await;
        if outcome.is_committed() {
            self.notices.success("Report submitted");
        }
        outcome
    }

    /// Unpublish with an optimistic status change
    pub async fn unpublish(&self) -> MutationOutcome {
        let action = MutationAction::UnpublishEntity {
            entity_id: self.route.id,
        };
        run_mutation(
            &self.cache,
            &self.notices,
            &action,
            self.transport.unpublish_entity(self.route.id),
        )
        .await
    }

    /// Delete the entity. No optimistic patch: callers navigate away only
    /// on a Committed outcome, after which the entity key is stale and the
    /// next read-through confirms the deletion.
    pub async fn delete(&self) -> MutationOutcome {
        let action = MutationAction::DeleteEntity {
            entity_id: self.route.id,
        };
        let outcome = run_mutation(
            &self.cache,
            &self.notices,
            &action,
            self.transport.delete_entity(self.route.id),
        )
        .await;
        if outcome.is_committed() {
            self.cache.invalidate(CacheKey::Entity(self.route.id));
        }
        outcome
    }
}
