//! Exported native entry points.
//!
//! C ABI mirrors of the original script natives:
//! `SET_ENTITY_LIGHTS_IGNORE_ARTIFICIAL_STATE`,
//! `DOES_ENTITY_LIGHTS_IGNORE_ARTIFICIAL_STATE`,
//! `CLEAR_ALL_ENTITY_LIGHTS_IGNORE_ARTIFICIAL_STATE` and
//! `GET_ALL_ENTITIES_IGNORING_ARTIFICIAL_LIGHTS_STATE`, plus the
//! session-end notification the host's lifecycle event invokes.

use blackout_core::IgnoreOps;
use tracing::debug;

use crate::host::{self, HostResolver};
use crate::registry;

fn with_ops<T>(fallback: T, f: impl FnOnce(IgnoreOps<'_, HostResolver>) -> T) -> T {
    match host::host() {
        Some(api) => {
            let resolver = HostResolver(api);
            f(IgnoreOps::new(registry(), &resolver))
        }
        None => fallback,
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn blackout_set_entity_ignore(entity: i32, ignore: bool) {
    with_ops((), |ops| ops.set_ignore(entity, ignore));
}

#[unsafe(no_mangle)]
pub extern "C" fn blackout_entity_ignores(entity: i32) -> bool {
    with_ops(false, |ops| ops.is_ignored(entity))
}

#[unsafe(no_mangle)]
pub extern "C" fn blackout_clear_all() {
    with_ops((), |ops| ops.clear_all());
}

/// Write the handles of every entity still ignoring the blackout into
/// `out` (up to `cap`) and return how many were written. A null `out`
/// just returns the current count.
///
/// # Safety
///
/// `out` must be null or valid for `cap` writes of `i32`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn blackout_collect_ignoring(out: *mut i32, cap: usize) -> usize {
    let handles = with_ops(Vec::new(), |ops| ops.ignoring_handles());
    if out.is_null() {
        return handles.len();
    }

    let count = handles.len().min(cap);
    // SAFETY: `out` is valid for `cap >= count` writes per this
    // function's contract.
    unsafe { std::ptr::copy_nonoverlapping(handles.as_ptr(), out, count) };
    count
}

/// Invoked by the host when the network session ends; drops every
/// override regardless of whether a resolver is bound.
#[unsafe(no_mangle)]
pub extern "C" fn blackout_session_ended() {
    debug!("network session ended, clearing blackout overrides");
    registry().clear();
}
