//! # blackout-natives
//!
//! Host-facing plugin: bootstraps the blackout-override subsystem inside
//! the game process and exports the script natives.
//!
//! On load (Windows), a detached thread initializes logging, maps the
//! host module image, locates the scene-light anchors by signature, and
//! installs the detour. If any of that fails the subsystem stays down:
//! the natives keep working against an empty registry and no partial
//! hook is left behind.

pub mod host;
mod natives;

pub use host::HostApi;

use std::sync::LazyLock;

use blackout_core::IgnoreRegistry;

static REGISTRY: LazyLock<IgnoreRegistry> = LazyLock::new(IgnoreRegistry::new);

pub(crate) fn registry() -> &'static IgnoreRegistry {
    LazyLock::force(&REGISTRY)
}

#[cfg(target_os = "windows")]
mod bootstrap {
    use std::ffi::c_void;

    use anyhow::Context;
    use blackout_core::{LocateAnchors, ModuleImage, SignatureLocator};
    use tracing::{error, info};
    use tracing_subscriber::EnvFilter;
    use windows::Win32::Foundation::{BOOL, HMODULE};
    use windows::Win32::System::SystemServices::DLL_PROCESS_ATTACH;

    fn init() -> anyhow::Result<()> {
        let image = ModuleImage::current().context("map host module image")?;
        info!(
            "scanning host image at {:#x} ({} bytes)",
            image.base(),
            image.size()
        );

        let locator = SignatureLocator::new(image.window());
        let anchors = locator.locate().context("locate scene-light anchors")?;

        // SAFETY: the anchors come from a locate pass against the image
        // the hook patches.
        unsafe { blackout_core::hook::install(&anchors, super::registry()) }
            .context("install scene-light hook")?;
        Ok(())
    }

    fn attach() {
        std::thread::spawn(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("blackout=info")),
                )
                .try_init();

            match init() {
                Ok(()) => info!("blackout override initialized"),
                Err(e) => error!("blackout override disabled: {e:#}"),
            }
        });
    }

    #[unsafe(no_mangle)]
    #[allow(non_snake_case)]
    extern "system" fn DllMain(_module: HMODULE, reason: u32, _reserved: *const c_void) -> BOOL {
        if reason == DLL_PROCESS_ATTACH {
            attach();
        }
        true.into()
    }
}
