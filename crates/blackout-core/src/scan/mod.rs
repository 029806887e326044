mod matcher;
mod pattern;
mod signature;

pub use matcher::{find_all, find_first, find_in_range};
pub use pattern::Pattern;
pub use signature::{
    CodeSignature, FlagRefSignature, LightingSignatures, load_signatures, save_signatures,
};
