//! Session identity and detail-page route types

use curio_core_types::Sensitive;

use super::ids::{EntityId, UserId};
use crate::errors::{Result, SyncError};

/// An authenticated user as seen by this client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub is_moderator: bool,
}

/// Session identity plus the client-side preferences that affect gating
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Present when the caller is signed in
    pub viewer: Option<Viewer>,
    /// Standing preference disabling the mature-content gate
    pub hide_mature_gate: bool,
    /// Bearer token attached by transport implementations; never logged
    pub auth_token: Option<Sensitive<String>>,
}

impl Session {
    /// An anonymous session with default preferences
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session for the given user
    pub fn signed_in(id: UserId, is_moderator: bool) -> Self {
        Self {
            viewer: Some(Viewer { id, is_moderator }),
            hide_mature_gate: false,
            auth_token: None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn is_moderator(&self) -> bool {
        self.viewer.as_ref().is_some_and(|v| v.is_moderator)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.viewer.as_ref().map(|v| v.id)
    }
}

/// Flags carried on the detail-page route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteFlags {
    /// The route requests the edit form
    pub edit: bool,
    /// Explicit opt-in to sensitive content for this visit
    pub show_mature: bool,
}

/// Parsed detail-page route
///
/// Parsing happens at the routing boundary, before the synchronization
/// layer is engaged; a malformed identifier never reaches the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRoute {
    pub id: EntityId,
    pub flags: RouteFlags,
}

impl EntityRoute {
    /// Parse the id segment of a detail-page route
    ///
    /// # Errors
    ///
    /// Returns `InvalidRouteId` for a non-numeric segment. Callers resolve
    /// this directly to the NotFound render state.
    pub fn parse(raw_id: &str, flags: RouteFlags) -> Result<Self> {
        let id = raw_id
            .parse::<EntityId>()
            .map_err(|_| SyncError::InvalidRouteId {
                segment: raw_id.to_string(),
            })?;
        Ok(Self { id, flags })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SyncErrorKind;

    #[test]
    fn test_anonymous_session() {
        let session = Session::anonymous();
        assert!(!session.is_signed_in());
        assert!(!session.is_moderator());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_moderator_session() {
        let session = Session::signed_in(UserId::new(3), true);
        assert!(session.is_signed_in());
        assert!(session.is_moderator());
        assert_eq!(session.user_id(), Some(UserId::new(3)));
    }

    #[test]
    fn test_route_parse_numeric() {
        let route = EntityRoute::parse("42", RouteFlags::default()).unwrap();
        assert_eq!(route.id, EntityId::new(42));
        assert!(!route.flags.edit);
    }

    #[test]
    fn test_route_parse_rejects_non_numeric() {
        let err = EntityRoute::parse("latest", RouteFlags::default()).unwrap_err();
        assert_eq!(err.kind(), SyncErrorKind::InvalidRoute);
    }

    #[test]
    fn test_session_token_is_redacted_in_debug() {
        let mut session = Session::anonymous();
        session.auth_token = Some(Sensitive::new("tok-123".to_string()));
        assert!(!format!("{:?}", session).contains("tok-123"));
    }
}
