//! End-to-end page session scenarios over a scripted transport

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use chrono::Utc;

use curio_core::cache::{CacheKey, CacheValue, RemoteCache};
use curio_core::model::{
    Cursor, Entity, EntityId, EntityRoute, PageRequest, PublicationStatus, Review, ReviewFilters,
    ReviewId, ReviewPage, ReviewSort, RouteFlags, Session, UserId,
};
use curio_core::mutation::{MutationAction, ReportReason};
use curio_core::notify::{NoticeKind, NoticeLog};
use curio_core::queries::view_gate::RenderState;
use curio_engine::{run_mutation, EntityPageSession, Transport, TransportError, TransportResult};

// ===== SCRIPTED TRANSPORT =====

#[derive(Default)]
struct FakeTransport {
    entity: Option<Entity>,
    favorites: BTreeSet<EntityId>,
    pages: RefCell<VecDeque<TransportResult<ReviewPage>>>,
    fail_mutations: Cell<bool>,
    calls: RefCell<Vec<&'static str>>,
    cursors_seen: RefCell<Vec<Option<String>>>,
}

impl FakeTransport {
    fn with_entity(entity: Entity) -> Self {
        Self {
            entity: Some(entity),
            ..Self::default()
        }
    }

    fn queue_page(&self, ids: &[u64], next: Option<&str>) {
        self.pages.borrow_mut().push_back(Ok(ReviewPage {
            reviews: ids.iter().map(|id| review(*id)).collect(),
            next_cursor: next.map(Cursor::new),
        }));
    }

    fn queue_page_error(&self) {
        self.pages
            .borrow_mut()
            .push_back(Err(TransportError::Network {
                reason: "offline".to_string(),
            }));
    }

    fn mutation_result(&self, call: &'static str) -> TransportResult<()> {
        self.calls.borrow_mut().push(call);
        if self.fail_mutations.get() {
            Err(TransportError::Rejected {
                reason: "scripted failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn entity_by_id(&self, _id: EntityId) -> TransportResult<Option<Entity>> {
        self.calls.borrow_mut().push("entity_by_id");
        Ok(self.entity.clone())
    }

    async fn favorite_memberships(&self) -> TransportResult<BTreeSet<EntityId>> {
        self.calls.borrow_mut().push("favorite_memberships");
        Ok(self.favorites.clone())
    }

    async fn reviews(&self, request: &PageRequest) -> TransportResult<ReviewPage> {
        self.cursors_seen
            .borrow_mut()
            .push(request.cursor.as_ref().map(|c| c.as_str().to_string()));
        self.pages.borrow_mut().pop_front().unwrap_or(Ok(ReviewPage {
            reviews: Vec::new(),
            next_cursor: None,
        }))
    }

    async fn toggle_favorite(&self, _id: EntityId) -> TransportResult<()> {
        self.mutation_result("toggle_favorite")
    }

    async fn report_entity(&self, _id: EntityId, _reason: ReportReason) -> TransportResult<()> {
        self.mutation_result("report_entity")
    }

    async fn unpublish_entity(&self, _id: EntityId) -> TransportResult<()> {
        self.mutation_result("unpublish_entity")
    }

    async fn delete_entity(&self, _id: EntityId) -> TransportResult<()> {
        self.mutation_result("delete_entity")
    }
}

// ===== HELPERS =====

fn published_entity(id: u64, favorite_count: u64) -> Entity {
    let mut entity = Entity::new(EntityId::new(id), format!("entity-{}", id), UserId::new(1));
    entity.status = PublicationStatus::Published;
    entity.rank.favorite_count_all_time = favorite_count;
    entity
}

fn review(id: u64) -> Review {
    Review {
        id: ReviewId::new(id),
        entity_id: EntityId::new(42),
        version_id: None,
        author: UserId::new(id),
        author_name: format!("user-{}", id),
        rating: 4,
        body: Some("solid".to_string()),
        created_at: Utc::now(),
    }
}

fn page_session(
    transport: Rc<FakeTransport>,
    session: Session,
    flags: RouteFlags,
) -> EntityPageSession {
    let route = EntityRoute {
        id: EntityId::new(42),
        flags,
    };
    EntityPageSession::new(Rc::new(RemoteCache::new()), transport, session, route)
}

fn membership(page: &EntityPageSession) -> bool {
    page.cache()
        .read(CacheKey::Favorites)
        .and_then(|v| v.as_favorites().cloned())
        .is_some_and(|set| set.contains(&EntityId::new(42)))
}

fn favorite_count(page: &EntityPageSession) -> u64 {
    page.entity().unwrap().rank.favorite_count_all_time
}

// ===== LOADING AND RENDER STATES =====

#[tokio::test]
async fn test_load_settles_entity_and_renders_normal() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    transport.queue_page(&[1, 2], None);
    let page = page_session(transport.clone(), Session::anonymous(), RouteFlags::default());

    assert_eq!(page.render_state(), RenderState::Loading);
    page.load().await;

    assert_eq!(page.render_state(), RenderState::Normal);
    assert_eq!(page.entity().unwrap().id, EntityId::new(42));
    assert_eq!(page.reviews().len(), 2);
    // Anonymous sessions have no memberships to fetch
    assert!(!transport.calls.borrow().contains(&"favorite_memberships"));
}

#[tokio::test]
async fn test_missing_entity_renders_not_found() {
    let transport = Rc::new(FakeTransport::default());
    let page = page_session(transport, Session::anonymous(), RouteFlags::default());

    page.load().await;
    assert_eq!(page.render_state(), RenderState::NotFound);
}

#[tokio::test]
async fn test_second_load_skips_settled_entity() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(transport.clone(), Session::anonymous(), RouteFlags::default());

    page.load().await;
    page.ensure_entity().await;

    let fetches = transport
        .calls
        .borrow()
        .iter()
        .filter(|c| **c == "entity_by_id")
        .count();
    assert_eq!(fetches, 1);
}

#[tokio::test]
async fn test_content_gate_flips_with_route_opt_in() {
    let mut entity = published_entity(42, 0);
    entity.sensitive = true;

    let transport = Rc::new(FakeTransport::with_entity(entity.clone()));
    let page = page_session(transport, Session::anonymous(), RouteFlags::default());
    page.load().await;
    assert_eq!(page.render_state(), RenderState::ContentGate);

    let transport = Rc::new(FakeTransport::with_entity(entity));
    let opted_in = RouteFlags {
        edit: false,
        show_mature: true,
    };
    let page = page_session(transport, Session::anonymous(), opted_in);
    page.load().await;
    assert_eq!(page.render_state(), RenderState::Normal);
}

#[tokio::test]
async fn test_moderator_edit_route_renders_edit_form() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 0)));
    let flags = RouteFlags {
        edit: true,
        show_mature: false,
    };
    let page = page_session(transport, Session::signed_in(UserId::new(99), true), flags);

    page.load().await;
    assert_eq!(page.render_state(), RenderState::EditForm);
}

// ===== OPTIMISTIC TOGGLE =====

#[tokio::test]
async fn test_toggle_failure_rolls_back_and_records_notice() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(
        transport.clone(),
        Session::signed_in(UserId::new(7), false),
        RouteFlags::default(),
    );
    page.load().await;
    assert!(!membership(&page));
    assert_eq!(favorite_count(&page), 5);

    transport.fail_mutations.set(true);
    let outcome = page.toggle_favorite().await;

    assert!(!outcome.is_committed());
    assert!(!membership(&page));
    assert_eq!(favorite_count(&page), 5);

    let notices = page.notices().snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Failure);
    assert!(notices[0].message.contains("toggle_favorite"));
}

#[tokio::test]
async fn test_toggle_success_commits_prediction() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(
        transport.clone(),
        Session::signed_in(UserId::new(7), false),
        RouteFlags::default(),
    );
    page.load().await;

    let outcome = page.toggle_favorite().await;

    assert!(outcome.is_committed());
    assert!(membership(&page));
    assert_eq!(favorite_count(&page), 6);
    // Membership re-fetches on the next read-through; rank keeps prediction
    assert!(page.cache().is_stale(CacheKey::Favorites));
    assert!(!page.cache().is_stale(CacheKey::Entity(EntityId::new(42))));
    assert!(page.notices().is_empty());
}

#[tokio::test]
async fn test_prediction_is_visible_before_settlement() {
    let cache = Rc::new(RemoteCache::new());
    cache.write(
        CacheKey::Entity(EntityId::new(42)),
        CacheValue::Entity(published_entity(42, 5)),
    );
    cache.write(CacheKey::Favorites, CacheValue::Favorites(BTreeSet::new()));
    let notices = NoticeLog::new();
    let action = MutationAction::ToggleFavorite {
        entity_id: EntityId::new(42),
    };

    let observer = cache.clone();
    let call = async move {
        // Begin has run, the server has not answered: the UI already
        // reflects the intended outcome.
        let count = observer
            .read(CacheKey::Entity(EntityId::new(42)))
            .and_then(|v| v.into_entity())
            .unwrap()
            .rank
            .favorite_count_all_time;
        assert_eq!(count, 6);
        Err(TransportError::Rejected {
            reason: "scripted failure".to_string(),
        })
    };

    let outcome = run_mutation(&cache, &notices, &action, call).await;
    assert!(!outcome.is_committed());

    let count = cache
        .read(CacheKey::Entity(EntityId::new(42)))
        .and_then(|v| v.into_entity())
        .unwrap()
        .rank
        .favorite_count_all_time;
    assert_eq!(count, 5);
    assert_eq!(notices.snapshot().len(), 1);
}

// ===== OTHER MUTATIONS =====

#[tokio::test]
async fn test_report_commits_without_patch() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(
        transport.clone(),
        Session::signed_in(UserId::new(7), false),
        RouteFlags::default(),
    );
    page.load().await;

    let outcome = page.report(ReportReason::TosViolation).await;

    assert!(outcome.is_committed());
    assert_eq!(favorite_count(&page), 5);
    let notices = page.notices().snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
}

#[tokio::test]
async fn test_unpublish_keeps_predicted_status_after_commit() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(
        transport,
        Session::signed_in(UserId::new(1), false),
        RouteFlags::default(),
    );
    page.load().await;

    let outcome = page.unpublish().await;

    assert!(outcome.is_committed());
    assert_eq!(
        page.entity().unwrap().status,
        PublicationStatus::Unpublished
    );
}

#[tokio::test]
async fn test_delete_marks_entity_for_refetch_on_commit() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 5)));
    let page = page_session(
        transport,
        Session::signed_in(UserId::new(1), false),
        RouteFlags::default(),
    );
    page.load().await;

    let outcome = page.delete().await;

    assert!(outcome.is_committed());
    // Caller navigates away on Committed; the stale key confirms deletion
    // on any later read-through.
    assert!(page.cache().is_stale(CacheKey::Entity(EntityId::new(42))));
}

// ===== REVIEW PAGINATION =====

#[tokio::test]
async fn test_pagination_walks_cursor_chain_without_repeats() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 0)));
    transport.queue_page(&[1, 2], Some("c1"));
    transport.queue_page(&[3], Some("c2"));
    transport.queue_page(&[4], None);
    let page = page_session(transport.clone(), Session::anonymous(), RouteFlags::default());
    page.load().await;

    assert!(page.on_sentinel_visible(true).await);
    assert!(page.on_sentinel_visible(true).await);
    // Exhausted: the trigger is a no-op and the transport sees no call
    assert!(!page.on_sentinel_visible(true).await);

    assert_eq!(
        *transport.cursors_seen.borrow(),
        vec![None, Some("c1".to_string()), Some("c2".to_string())]
    );
    let ids: Vec<u64> = page.reviews().iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_page_fetch_failure_retries_same_cursor() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 0)));
    transport.queue_page(&[1], Some("c1"));
    transport.queue_page_error();
    transport.queue_page(&[2], None);
    let page = page_session(transport.clone(), Session::anonymous(), RouteFlags::default());
    page.load().await;

    assert!(!page.fetch_next_reviews().await);
    assert_eq!(page.notices().snapshot().len(), 1);

    assert!(page.fetch_next_reviews().await);
    assert_eq!(
        *transport.cursors_seen.borrow(),
        vec![None, Some("c1".to_string()), Some("c1".to_string())]
    );
}

#[tokio::test]
async fn test_filter_change_resets_to_first_page() {
    let transport = Rc::new(FakeTransport::with_entity(published_entity(42, 0)));
    transport.queue_page(&[1, 2], Some("c1"));
    transport.queue_page(&[9], None);
    let page = page_session(transport.clone(), Session::anonymous(), RouteFlags::default());
    page.load().await;
    assert_eq!(page.reviews().len(), 2);

    page.change_review_query(
        ReviewSort::HighestRated,
        ReviewFilters {
            version_id: None,
            with_body_only: true,
        },
    )
    .await;

    let ids: Vec<u64> = page.reviews().iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![9]);
    assert_eq!(
        *transport.cursors_seen.borrow(),
        vec![None, None]
    );
}
