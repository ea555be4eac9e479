use std::path::PathBuf;

use crate::foundation::error::{DynwallError, DynwallResult};

/// Display-mode preference attached to a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Appearance {
    /// Preferred frame in light mode.
    Light,
    /// Preferred frame in dark mode.
    Dark,
}

/// One scheduled image.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Absolute path of the source image.
    pub image_path: PathBuf,
    /// Activation time as a fraction of the day, `[0, 1)`; `1.0` only for the end-of-day marker.
    pub normalized_time: f64,
    /// Optional light/dark tag.
    pub appearance: Option<Appearance>,
}

/// Validated, time-sorted frames for one build.
///
/// A frame's position in [`FrameSchedule::frames`] is the index written into the `h24` payload
/// and the index of its image in the output container.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSchedule {
    frames: Vec<Frame>,
}

impl FrameSchedule {
    /// Sort frames by time and validate strict ordering and length.
    pub fn new(mut frames: Vec<Frame>) -> DynwallResult<Self> {
        frames.sort_by(|a, b| a.normalized_time.total_cmp(&b.normalized_time));

        for pair in frames.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            if later.normalized_time <= earlier.normalized_time {
                return Err(DynwallError::DuplicateOrUnorderedTime(format!(
                    "'{}' and '{}' both at {}",
                    earlier.image_path.display(),
                    later.image_path.display(),
                    later.normalized_time
                )));
            }
        }

        if frames.len() < 2 {
            return Err(DynwallError::InsufficientFrames(frames.len()));
        }

        Ok(Self { frames })
    }

    /// Frames in schedule order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames (always >= 2).
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First-match scan for each appearance tag.
    pub fn appearance_index(&self) -> AppearanceIndex {
        let first = |wanted: Appearance| {
            self.frames
                .iter()
                .position(|f| f.appearance == Some(wanted))
        };
        AppearanceIndex {
            light: first(Appearance::Light),
            dark: first(Appearance::Dark),
        }
    }
}

/// Schedule positions of the first light-tagged and first dark-tagged frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppearanceIndex {
    /// Position of the first [`Appearance::Light`] frame.
    pub light: Option<usize>,
    /// Position of the first [`Appearance::Dark`] frame.
    pub dark: Option<usize>,
}

impl AppearanceIndex {
    /// `true` when at least one index is present and an `ap` entry should be written.
    pub fn is_present(self) -> bool {
        self.light.is_some() || self.dark.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/model.rs"]
mod tests;
