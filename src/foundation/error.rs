use std::path::PathBuf;

/// Convenience result type used across dynwall.
pub type DynwallResult<T> = Result<T, DynwallError>;

/// Error taxonomy for a wallpaper build.
///
/// Every failure is reported once, unmodified, to the caller of
/// [`crate::build_dynamic_wallpaper`]; the `Display` text is the user-facing message.
#[derive(thiserror::Error, Debug)]
pub enum DynwallError {
    /// The manifest file does not exist.
    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest is not syntactically valid JSON.
    #[error("failed to parse JSON manifest: {0}")]
    ManifestParse(String),

    /// The manifest's top-level value has the wrong shape.
    #[error("manifest shape error: {0}")]
    ManifestShape(String),

    /// A frame entry has the wrong shape.
    #[error("frame shape error: {0}")]
    FrameShape(String),

    /// A required frame field is absent.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A time string is not `HH:MM` or `HH:MM:SS` with numeric components.
    #[error("invalid time format '{0}': expected HH:MM or HH:MM:SS")]
    InvalidTimeFormat(String),

    /// A time component is outside its allowed range.
    #[error("time out of range: {0}")]
    TimeOutOfRange(String),

    /// An appearance marker is neither `light` nor `dark`.
    #[error("invalid appearance '{0}': must be 'light', 'dark', or omitted")]
    InvalidAppearance(String),

    /// Two frames share a time, or times are not strictly increasing after sorting.
    #[error("frame times must be strictly increasing within the 24h cycle: {0}")]
    DuplicateOrUnorderedTime(String),

    /// Fewer than two frames were loaded.
    #[error("dynamic wallpaper requires at least two frames, got {0}")]
    InsufficientFrames(usize),

    /// A referenced image file does not exist.
    #[error("image file not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// Frame dimensions differ under [`crate::ResizeMode::Strict`].
    #[error("all images must share the same dimensions in strict resize mode: {0}")]
    SizeMismatch(String),

    /// A resize mode string is not recognized.
    #[error("unknown resize mode '{0}': expected 'fit' or 'strict'")]
    UnknownResizeMode(String),

    /// Encoder quality outside `1..=100`.
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// Image decode or container encode failure.
    #[error("codec error: {0}")]
    Codec(String),

    /// Property list, base64 or XMP packet failure.
    #[error("metadata error: {0}")]
    Metadata(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DynwallError {
    /// Build a [`DynwallError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`DynwallError::Metadata`] value.
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
