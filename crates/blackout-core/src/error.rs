use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Pattern not found: {name}")]
    PatternNotFound { name: String },

    #[error("Relative reference at {address:#x} lies outside the scanned image")]
    ReferenceOutOfBounds { address: u64 },

    #[error("Invalid signature pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to map the host module image: {0}")]
    ImageUnavailable(String),

    #[error("Failed to install hook: {0}")]
    HookInstall(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error means the host binary no longer matches the
    /// expected layout. The subsystem must abort initialization in that
    /// case rather than come up with a partial hook.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::PatternNotFound { .. }
                | Error::ReferenceOutOfBounds { .. }
                | Error::ImageUnavailable(_)
                | Error::HookInstall(_)
        )
    }
}
