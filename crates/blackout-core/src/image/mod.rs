#[cfg(target_os = "windows")]
mod module;
mod window;

#[cfg(test)]
pub mod mock;

#[cfg(target_os = "windows")]
pub use module::ModuleImage;
pub use window::ImageWindow;
