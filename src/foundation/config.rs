use std::str::FromStr;

use crate::foundation::error::{DynwallError, DynwallResult};

/// Encoder quality used when the caller does not pick one.
pub const DEFAULT_QUALITY: u8 = 90;

/// How frames whose dimensions differ from the first frame are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizeMode {
    /// Resample to the first frame's size with a Lanczos filter.
    #[default]
    Fit,
    /// Fail with [`DynwallError::SizeMismatch`].
    Strict,
}

impl ResizeMode {
    /// Lower-case name as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for ResizeMode {
    type Err = DynwallError;

    fn from_str(s: &str) -> DynwallResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Self::Fit),
            "strict" => Ok(Self::Strict),
            _ => Err(DynwallError::UnknownResizeMode(s.to_owned())),
        }
    }
}

impl std::fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOpts {
    /// Container encoder quality, `1..=100`.
    pub quality: u8,
    /// Policy for frames with mismatched dimensions.
    pub resize_mode: ResizeMode,
}

impl Default for BuildOpts {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            resize_mode: ResizeMode::Fit,
        }
    }
}

impl BuildOpts {
    /// Reject options no encoder accepts.
    pub fn validate(&self) -> DynwallResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(DynwallError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
