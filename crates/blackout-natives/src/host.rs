//! Binding to the embedding host's entity resolver.
//!
//! The host supplies a function-pointer table once at load time; every
//! native resolves script handles through it. Until the table is bound
//! the natives degrade to no-ops.

use std::sync::OnceLock;

use blackout_core::{EntityId, ResolveHandle};
use tracing::info;

/// Function table the embedding host supplies. Handles are the
/// script-visible integers; entities are the engine's stable identities
/// expressed as raw addresses. Both directions use 0 as the "does not
/// resolve" sentinel.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct HostApi {
    pub entity_from_handle: unsafe extern "C" fn(handle: i32) -> usize,
    pub handle_from_entity: unsafe extern "C" fn(entity: usize) -> i32,
}

static HOST: OnceLock<HostApi> = OnceLock::new();

pub(crate) fn host() -> Option<&'static HostApi> {
    HOST.get()
}

/// [`ResolveHandle`] over the bound host table.
pub(crate) struct HostResolver(pub(crate) &'static HostApi);

impl ResolveHandle for HostResolver {
    fn entity_from_handle(&self, handle: i32) -> Option<EntityId> {
        // SAFETY: the host guarantees its table entries stay callable for
        // the process lifetime.
        EntityId::new(unsafe { (self.0.entity_from_handle)(handle) })
    }

    fn handle_from_entity(&self, id: EntityId) -> Option<i32> {
        // SAFETY: as above.
        match unsafe { (self.0.handle_from_entity)(id.raw()) } {
            0 => None,
            handle => Some(handle),
        }
    }
}

/// Called by the host once, before any native is used. Returns `false`
/// on a null table or a repeated bind.
///
/// # Safety
///
/// `api` must be null or point at a valid [`HostApi`] whose function
/// pointers remain callable for the process lifetime.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blackout_bind_host(api: *const HostApi) -> bool {
    // SAFETY: null-checked dereference per this function's contract.
    let Some(api) = (unsafe { api.as_ref() }) else {
        return false;
    };

    let bound = HOST.set(*api).is_ok();
    if bound {
        info!("host resolver bound");
    }
    bound
}
