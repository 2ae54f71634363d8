//! Back-navigation return-context rewriting
//!
//! When the user navigates back to a known listing route, the target's
//! query string gains a return-context marker carrying the current entity
//! id, so the listing can restore scroll/highlight state. Best-effort: a
//! malformed or unmatched target is left untouched and navigation is never
//! blocked.

use crate::model::EntityId;

/// Query parameter carrying the entity the user is returning from
pub const RETURN_CONTEXT_PARAM: &str = "from_entity";

/// A path-prefix pattern identifying routes that accept return context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern(String);

impl RoutePattern {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Match against the path portion of a target (query excluded)
    pub fn matches(&self, path: &str) -> bool {
        path == self.0 || path.strip_prefix(self.0.as_str()).is_some_and(|rest| {
            self.0.ends_with('/') || rest.starts_with('/')
        })
    }
}

/// Rewrite a backward-navigation target to carry the current entity id
///
/// Returns `None` when the target is malformed, matches no known pattern,
/// or already carries a return-context marker; the caller then lets the
/// navigation proceed untouched.
pub fn rewrite_back_target(
    target: &str,
    patterns: &[RoutePattern],
    entity_id: EntityId,
) -> Option<String> {
    if target.is_empty() || target.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    };

    if !patterns.iter().any(|p| p.matches(path)) {
        return None;
    }

    let marker = format!("{}={}", RETURN_CONTEXT_PARAM, entity_id);
    match query {
        Some(query) => {
            let already_marked = query
                .split('&')
                .any(|pair| pair.split('=').next() == Some(RETURN_CONTEXT_PARAM));
            if already_marked {
                return None;
            }
            Some(format!("{}?{}&{}", path, query, marker))
        }
        None => Some(format!("{}?{}", path, marker)),
    }
}
