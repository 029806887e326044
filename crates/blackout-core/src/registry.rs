//! Thread-safe set of entities that ignore the blackout.
//!
//! Read-heavy / write-light: `contains` runs on every intercepted
//! scene-light call, while mutation only happens from scripted requests
//! and the session-end event. A single reader-writer lock covers the
//! whole lifetime of the set.

use std::collections::HashSet;
use std::ffi::c_void;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-lifetime identity of a live engine entity. Treated as an
/// opaque key and never dereferenced; an id may outlive the entity it
/// named, which degrades to a harmless stale membership entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(usize);

impl EntityId {
    pub fn new(raw: usize) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn from_ptr(ptr: *const c_void) -> Option<Self> {
        Self::new(ptr as usize)
    }

    pub fn raw(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct IgnoreRegistry {
    entities: RwLock<HashSet<EntityId>>,
}

impl IgnoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: inserting a present id changes nothing.
    pub fn insert(&self, id: EntityId) {
        self.write().insert(id);
    }

    /// Removing an absent id is a no-op, not an error.
    pub fn remove(&self, id: EntityId) {
        self.write().remove(&id);
    }

    /// Membership test under a shared lock; the hot path.
    pub fn contains(&self, id: EntityId) -> bool {
        self.read().contains(&id)
    }

    /// Removes every entry. Readers observe the set either before or
    /// after the clear, never mid-way.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Point-in-time copy of the members, in no particular order.
    /// Mutation after the call is not reflected.
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.read().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A set abandoned by a panicking writer is still a valid set, so a
    // poisoned lock is recovered rather than propagated.
    fn read(&self) -> RwLockReadGuard<'_, HashSet<EntityId>> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<EntityId>> {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn id(raw: usize) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn test_entity_id_rejects_null() {
        assert!(EntityId::new(0).is_none());
        assert!(EntityId::from_ptr(std::ptr::null()).is_none());
        assert_eq!(id(0xD0D0).raw(), 0xD0D0);
    }

    #[test]
    fn test_sequence_semantics() {
        let registry = IgnoreRegistry::new();

        registry.insert(id(1));
        assert!(registry.contains(id(1)));

        registry.remove(id(1));
        assert!(!registry.contains(id(1)));

        registry.insert(id(1));
        registry.clear();
        assert!(!registry.contains(id(1)));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let registry = IgnoreRegistry::new();
        registry.insert(id(7));
        registry.insert(id(7));
        assert_eq!(registry.len(), 1);

        registry.remove(id(7));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_on_empty_is_noop() {
        let registry = IgnoreRegistry::new();
        registry.remove(id(42));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_set_equality() {
        let registry = IgnoreRegistry::new();
        registry.insert(id(1));
        registry.insert(id(2));
        registry.insert(id(3));
        registry.remove(id(2));

        let snapshot: HashSet<EntityId> = registry.snapshot().into_iter().collect();
        assert_eq!(snapshot, HashSet::from([id(1), id(3)]));

        registry.clear();
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn test_clear_is_atomic_for_readers() {
        const MEMBERS: usize = 64;

        let registry = Arc::new(IgnoreRegistry::new());
        for raw in 1..=MEMBERS {
            registry.insert(id(raw));
        }

        let cleared = Arc::new(AtomicBool::new(false));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let cleared = Arc::clone(&cleared);
                thread::spawn(move || {
                    while !cleared.load(Ordering::Acquire) {
                        let seen = registry.snapshot().len();
                        assert!(
                            seen == 0 || seen == MEMBERS,
                            "observed partially cleared set ({seen} of {MEMBERS})"
                        );
                    }
                })
            })
            .collect();

        registry.clear();
        cleared.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_contains_under_concurrent_mutation() {
        let registry = Arc::new(IgnoreRegistry::new());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut hits = 0usize;
                    while !done.load(Ordering::Acquire) {
                        if registry.contains(id(1)) {
                            hits += 1;
                        }
                    }
                    hits
                })
            })
            .collect();

        for _ in 0..1_000 {
            registry.insert(id(1));
            registry.insert(id(2));
            registry.remove(id(2));
            registry.clear();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
        assert!(registry.is_empty());
    }
}
