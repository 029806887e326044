//! Script-facing operations over the ignore registry.
//!
//! Handles are the integers scripts pass around; the host's resolver
//! turns them into engine entity identities and back. Handles expire
//! naturally as entities are destroyed, so a failed resolution is never
//! an error: set degrades to a no-op, query to `false`, enumeration
//! silently drops the entry.

use tracing::debug;

use crate::registry::{EntityId, IgnoreRegistry};

/// Bidirectional handle⇄entity resolver supplied by the embedding host.
pub trait ResolveHandle {
    /// `None` when the handle does not name a live entity.
    fn entity_from_handle(&self, handle: i32) -> Option<EntityId>;

    /// `None` when the entity no longer resolves to a script handle
    /// (the host's 0 sentinel).
    fn handle_from_entity(&self, id: EntityId) -> Option<i32>;
}

pub struct IgnoreOps<'a, R: ResolveHandle> {
    registry: &'a IgnoreRegistry,
    resolver: &'a R,
}

impl<'a, R: ResolveHandle> IgnoreOps<'a, R> {
    pub fn new(registry: &'a IgnoreRegistry, resolver: &'a R) -> Self {
        Self { registry, resolver }
    }

    /// Mark or unmark an entity as ignoring the blackout.
    pub fn set_ignore(&self, handle: i32, ignore: bool) {
        let Some(id) = self.resolver.entity_from_handle(handle) else {
            return;
        };

        if ignore {
            self.registry.insert(id);
        } else {
            self.registry.remove(id);
        }
    }

    pub fn is_ignored(&self, handle: i32) -> bool {
        self.resolver
            .entity_from_handle(handle)
            .is_some_and(|id| self.registry.contains(id))
    }

    pub fn clear_all(&self) {
        debug!("clearing blackout ignore set");
        self.registry.clear();
    }

    /// Script handles of every registered entity that still resolves.
    pub fn ignoring_handles(&self) -> Vec<i32> {
        self.registry
            .snapshot()
            .into_iter()
            .filter_map(|id| self.resolver.handle_from_entity(id))
            .collect()
    }
}
