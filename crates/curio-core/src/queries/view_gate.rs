//! Five-state render resolution for the entity detail page
//!
//! ## Priority order (first match wins):
//! 1. Loading - the entity fetch has not yet settled
//! 2. NotFound - fetch settled with no entity value
//! 3. EditForm - edit route flag, caller is owner or moderator
//! 4. ContentGate - sensitive entity, anonymous caller, no opt-in
//! 5. Normal - otherwise
//!
//! This is a stateless re-evaluation on every relevant input change, not a
//! stored state machine: "transitions" are just different outputs of the
//! same pure function as inputs change over time.

use crate::cache::FetchState;
use crate::model::{Entity, RouteFlags, Session};

/// The five exclusive render states of the detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    NotFound,
    EditForm,
    ContentGate,
    Normal,
}

/// Compute which branch of the page renders
///
/// Pure over its inputs; rendering re-invokes it whenever the session,
/// route, or cached entity state changes.
pub fn resolve(
    session: &Session,
    route: RouteFlags,
    fetch: FetchState,
    entity: Option<&Entity>,
) -> RenderState {
    if fetch != FetchState::Settled {
        return RenderState::Loading;
    }

    let Some(entity) = entity else {
        return RenderState::NotFound;
    };

    let may_edit = session.user_id().is_some_and(|id| entity.is_owned_by(id))
        || session.is_moderator();
    if route.edit && may_edit {
        return RenderState::EditForm;
    }

    if entity.sensitive
        && !session.is_signed_in()
        && !route.show_mature
        && !session.hide_mature_gate
    {
        return RenderState::ContentGate;
    }

    RenderState::Normal
}
