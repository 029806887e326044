//! View over the host executable's mapped image, sized from its PE
//! headers.

use std::slice;

use windows::Win32::System::Diagnostics::Debug::IMAGE_NT_HEADERS64;
use windows::Win32::System::LibraryLoader::GetModuleHandleA;
use windows::Win32::System::SystemServices::IMAGE_DOS_HEADER;
use windows::core::PCSTR;

use crate::error::{Error, Result};
use crate::image::ImageWindow;

/// The running executable's image: base address and `SizeOfImage` from the
/// PE optional header.
#[derive(Debug, Clone, Copy)]
pub struct ModuleImage {
    base: usize,
    size: usize,
}

impl ModuleImage {
    /// Image of the process's main module.
    pub fn current() -> Result<Self> {
        let module = unsafe { GetModuleHandleA(PCSTR::null()) }
            .map_err(|e| Error::ImageUnavailable(e.to_string()))?;
        let base = module.0 as usize;
        if base == 0 {
            return Err(Error::ImageUnavailable(
                "null module handle".to_string(),
            ));
        }

        // SAFETY: the DOS and NT headers live at fixed offsets from the
        // base of any mapped PE module.
        let size = unsafe {
            let dos = &*(base as *const IMAGE_DOS_HEADER);
            let nt = &*((base + dos.e_lfanew as usize) as *const IMAGE_NT_HEADERS64);
            nt.OptionalHeader.SizeOfImage as usize
        };

        Ok(Self { base, size })
    }

    pub fn base(&self) -> u64 {
        self.base as u64
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Window over the whole mapped image.
    ///
    /// The pages stay mapped for the process lifetime; scanning reads them
    /// as plain bytes.
    pub fn window(&self) -> ImageWindow<'_> {
        // SAFETY: base/size come from the loader's own headers for a
        // module that is never unmapped.
        let bytes = unsafe { slice::from_raw_parts(self.base as *const u8, self.size) };
        ImageWindow::new(self.base as u64, bytes)
    }
}
