//! # blackout-core
//!
//! Core library for the per-entity blackout override.
//!
//! This crate provides:
//! - Wildcard byte-pattern scanning over the host process image
//! - Rip-relative reference resolution for locating the blackout flags
//! - The scene-light interception body and (on Windows) its detour
//! - The thread-safe registry of entities that ignore the blackout
//!
//! Everything except the detour installer and the live module view is
//! platform-independent and runs against fixture images in tests.

pub mod error;
pub mod flags;
pub mod gate;
#[cfg(target_os = "windows")]
pub mod hook;
pub mod image;
pub mod layout;
pub mod locator;
pub mod ops;
pub mod registry;
pub mod scan;

pub use error::{Error, Result};
pub use flags::{FlagAccess, FlagPair, RawFlag};
pub use gate::SceneLightGate;
pub use image::ImageWindow;
#[cfg(target_os = "windows")]
pub use image::ModuleImage;
pub use locator::{LightingAnchors, LocateAnchors, SignatureLocator};
pub use ops::{IgnoreOps, ResolveHandle};
pub use registry::{EntityId, IgnoreRegistry};
pub use scan::{
    CodeSignature, FlagRefSignature, LightingSignatures, Pattern, load_signatures, save_signatures,
};
