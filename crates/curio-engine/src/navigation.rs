//! Back-navigation interception
//!
//! Restores listing context on backward navigation: while the detail page
//! is mounted, backward targets matching known route patterns get a
//! return-context marker appended to their query string. Best-effort and
//! non-blocking - a target the rewrite cannot handle proceeds untouched.
//! The guard restores the host's default interception behavior on drop.

use curio_core::model::EntityId;
use curio_core::nav::{rewrite_back_target, RoutePattern};

/// Host-side navigation hooks, implemented by the router adapter
pub trait NavigationHost {
    /// Install an interceptor consulted on backward navigation, replacing
    /// the default behavior
    fn set_back_interceptor(&self, interceptor: BackInterceptor);

    /// Restore the default interception behavior
    fn clear_back_interceptor(&self);
}

/// Rewrites backward-navigation targets to carry return context
#[derive(Debug, Clone)]
pub struct BackInterceptor {
    patterns: Vec<RoutePattern>,
    entity_id: EntityId,
}

impl BackInterceptor {
    pub fn new(patterns: Vec<RoutePattern>, entity_id: EntityId) -> Self {
        Self {
            patterns,
            entity_id,
        }
    }

    /// The rewritten target, or `None` to let the navigation proceed
    /// untouched. Never blocks the navigation itself.
    pub fn rewrite(&self, target: &str) -> Option<String> {
        rewrite_back_target(target, &self.patterns, self.entity_id)
    }
}

/// Guard that installs the interceptor for the lifetime of the page
pub struct BackSyncGuard<'host> {
    host: &'host dyn NavigationHost,
}

impl<'host> BackSyncGuard<'host> {
    pub fn install(
        host: &'host dyn NavigationHost,
        patterns: Vec<RoutePattern>,
        entity_id: EntityId,
    ) -> Self {
        host.set_back_interceptor(BackInterceptor::new(patterns, entity_id));
        Self { host }
    }
}

impl Drop for BackSyncGuard<'_> {
    fn drop(&mut self) {
        self.host.clear_back_interceptor();
    }
}
