//! Detour installation for the scene-light function.
//!
//! The detour is installed once per process and never removed; the
//! original entry point stays reachable only through the trampoline the
//! detour preserves. Install is two-phase (initialize, then enable) so
//! the redirect becomes visible only after the runtime state it needs is
//! in place.

use std::ffi::c_void;
use std::sync::OnceLock;

use retour::static_detour;
use tracing::info;

use crate::error::{Error, Result};
use crate::flags::{FlagPair, RawFlag};
use crate::gate::SceneLightGate;
use crate::layout;
use crate::locator::LightingAnchors;
use crate::registry::IgnoreRegistry;

type AddSceneLightFn = extern "C" fn(*mut c_void, *const c_void, bool) -> bool;

static_detour! {
    static AddSceneLightHook: extern "C" fn(*mut c_void, *const c_void, bool) -> bool;
}

struct HookRuntime {
    registry: &'static IgnoreRegistry,
    flags: Option<FlagPair<RawFlag>>,
}

static RUNTIME: OnceLock<HookRuntime> = OnceLock::new();

/// Install the scene-light detour at the located entry point.
///
/// Precondition: the target is not hooked yet. A second call fails with
/// `HookInstall` instead of re-hooking.
///
/// # Safety
///
/// `anchors` must come from a successful locate pass against the running
/// image: the function address must be the real entry point with the
/// expected signature, and the flag addresses must stay mapped and
/// writable for the process lifetime.
pub unsafe fn install(anchors: &LightingAnchors, registry: &'static IgnoreRegistry) -> Result<()> {
    let flags = (anchors.disable_lights != 0 && anchors.disable_veh_lights != 0).then(|| {
        // SAFETY: flag lifetime guaranteed by the caller's contract.
        unsafe {
            FlagPair::new(
                RawFlag::from_addr(anchors.disable_lights),
                RawFlag::from_addr(anchors.disable_veh_lights),
            )
        }
    });

    if RUNTIME.set(HookRuntime { registry, flags }).is_err() {
        return Err(Error::HookInstall(
            "scene-light hook already installed".to_string(),
        ));
    }

    // SAFETY: the address points at a function of this exact signature
    // per the caller's contract.
    let target: AddSceneLightFn = unsafe { std::mem::transmute(anchors.add_scene_light as usize) };

    // SAFETY: retour patches the prologue of `target`; the locate pass
    // matched the full prologue bytes, so the patch site is valid code.
    unsafe {
        AddSceneLightHook
            .initialize(target, add_scene_light_replacement)
            .map_err(|e| Error::HookInstall(e.to_string()))?;
        AddSceneLightHook
            .enable()
            .map_err(|e| Error::HookInstall(e.to_string()))?;
    }

    info!(
        "scene-light hook enabled at {:#x}",
        anchors.add_scene_light
    );
    Ok(())
}

/// Runs in place of the original function for every caller.
fn add_scene_light_replacement(
    scene_light: *mut c_void,
    light_entity: *const c_void,
    add_to_previous: bool,
) -> bool {
    let original = || AddSceneLightHook.call(scene_light, light_entity, add_to_previous);

    let Some(runtime) = RUNTIME.get() else {
        return original();
    };

    // SAFETY: the host passes a live light entity (or null) here.
    let parent = unsafe { layout::parent_entity(light_entity) };
    SceneLightGate::new(runtime.registry, runtime.flags.as_ref()).run(parent, original)
}
