use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::image::ImageWindow;
use crate::scan::Pattern;

/// A code signature anchoring an instruction that embeds a 4-byte signed
/// rip-relative displacement: the pattern locates the instruction, and
/// `disp_offset`/`instr_len` say where the displacement sits inside it.
///
/// The displacement is relative to the address immediately following the
/// instruction, so the referenced target is
/// `match + instr_len + displacement`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSignature {
    pub pattern: String,
    #[serde(default)]
    pub disp_offset: usize,
    pub instr_len: usize,
}

impl CodeSignature {
    pub fn pattern(&self) -> Result<Pattern> {
        Pattern::parse(&self.pattern)
    }

    /// Decode the displacement embedded at `match_addr` and return the
    /// absolute address it references.
    pub fn resolve(&self, image: &ImageWindow<'_>, match_addr: u64) -> Result<u64> {
        let disp_addr = match_addr + self.disp_offset as u64;
        let disp = image
            .read_i32(disp_addr)
            .ok_or(Error::ReferenceOutOfBounds { address: disp_addr })?;

        let next_ip = match_addr + self.instr_len as u64;
        Ok(next_ip.wrapping_add_signed(disp as i64))
    }
}

/// Signature of a flag reference inside the located function. Searched
/// only within the first `scan_window` bytes of the function to avoid
/// false positives elsewhere in the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagRefSignature {
    #[serde(flatten)]
    pub code: CodeSignature,
    pub scan_window: usize,
}

/// The full signature set for locating the scene-light function and the
/// two blackout flags. Loadable from JSON so a game update that shifts
/// the code can be absorbed by editing a file instead of rebuilding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingSignatures {
    pub version: String,
    /// Prologue of the scene-light registration function.
    pub add_scene_light: String,
    /// `cmp [rip+disp32], r12b` references to the blackout flags. The
    /// first match in scan order is the artificial-lights flag, the
    /// second the vehicle-lights variant.
    pub flag_ref: FlagRefSignature,
}

impl Default for LightingSignatures {
    fn default() -> Self {
        Self {
            version: "b2060".to_string(),
            add_scene_light: "48 8B C4 48 89 58 ?? 48 89 70 ?? 48 89 78 ?? 4C 89 60 ?? 55 41 56 41 57 48 8D 68 ?? 48 81 EC ?? ?? ?? ?? 0F 29 70 ?? 45 33 E4"
                .to_string(),
            flag_ref: FlagRefSignature {
                code: CodeSignature {
                    pattern: "44 38 25 ?? ?? ?? ??".to_string(),
                    disp_offset: 3,
                    instr_len: 7,
                },
                scan_window: 0x80,
            },
        }
    }
}

pub fn load_signatures<P: AsRef<Path>>(path: P) -> Result<LightingSignatures> {
    let content = fs::read_to_string(&path)?;
    let signatures = serde_json::from_str(&content)?;
    Ok(signatures)
}

pub fn save_signatures<P: AsRef<Path>>(path: P, signatures: &LightingSignatures) -> Result<()> {
    let content = serde_json::to_string_pretty(signatures)?;
    fs::write(path, content)?;
    Ok(())
}
