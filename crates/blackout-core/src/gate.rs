//! Interception body for the scene-light function.
//!
//! Each intercepted call runs through [`SceneLightGate::run`]: when the
//! light's parent entity is registered as ignoring the blackout, both
//! blackout flags are forced off around the delegated call and put back
//! afterwards. The gate holds no per-invocation state, so concurrent
//! intercepted calls and concurrent registry mutation are both fine; the
//! flag write window is scoped tightly around the single delegated call.

use crate::flags::{FlagAccess, FlagPair};
use crate::registry::{EntityId, IgnoreRegistry};

pub struct SceneLightGate<'a, F: FlagAccess> {
    registry: &'a IgnoreRegistry,
    flags: Option<&'a FlagPair<F>>,
}

impl<'a, F: FlagAccess> SceneLightGate<'a, F> {
    pub fn new(registry: &'a IgnoreRegistry, flags: Option<&'a FlagPair<F>>) -> Self {
        Self { registry, flags }
    }

    /// Run one intercepted call, delegating to `original` and returning
    /// its result unchanged.
    ///
    /// The flags are forced off only when the parent entity is registered
    /// and both flag addresses resolved at initialization; otherwise this
    /// is a plain passthrough. Restoration happens when the guard drops,
    /// so it also survives an unwinding original.
    pub fn run<T>(&self, parent: Option<EntityId>, original: impl FnOnce() -> T) -> T {
        let bypass = parent.is_some_and(|id| self.registry.contains(id));
        let _restore = match self.flags {
            Some(flags) if bypass => Some(ForcedOff::engage(flags)),
            _ => None,
        };
        original()
    }
}

/// Forces both flags off for the duration of one delegated call and puts
/// the snapshotted values back on drop.
struct ForcedOff<'f, F: FlagAccess> {
    flags: &'f FlagPair<F>,
    saved: (bool, bool),
}

impl<'f, F: FlagAccess> ForcedOff<'f, F> {
    fn engage(flags: &'f FlagPair<F>) -> Self {
        let saved = flags.snapshot();
        flags.force_off();
        Self { flags, saved }
    }
}

impl<F: FlagAccess> Drop for ForcedOff<'_, F> {
    fn drop(&mut self) {
        self.flags.restore(self.saved);
    }
}
