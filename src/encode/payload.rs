use serde::{Deserialize, Serialize};

use crate::foundation::error::{DynwallError, DynwallResult};
use crate::schedule::model::{AppearanceIndex, FrameSchedule};

// Fields are declared in sorted key order so the dictionaries come out the way a standard
// property-list writer would emit them.

/// The `h24` record: schedule timing plus optional appearance indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataPayload {
    /// Light/dark frame indices; omitted when neither is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ap: Option<AppearanceEntry>,
    /// One entry per frame in schedule order.
    pub ti: Vec<TimeEntry>,
}

/// `{ i, t }` pair: frame index and normalized time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Frame position in the schedule and the container.
    pub i: u64,
    /// Normalized time rounded to 6 decimals.
    pub t: f64,
}

/// `{ d, l }` appearance indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearanceEntry {
    /// Dark-mode frame index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<u64>,
    /// Light-mode frame index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<u64>,
}

/// Round to 6 decimal digits.
///
/// Rounds the exact decimal expansion of `t` (ties to even), not `t * 1e6`.
pub fn round_time(t: f64) -> f64 {
    format!("{t:.6}").parse().unwrap_or(t)
}

impl MetadataPayload {
    /// Build the record for a finalized schedule.
    pub fn from_schedule(schedule: &FrameSchedule, index: AppearanceIndex) -> Self {
        let ti = schedule
            .frames()
            .iter()
            .enumerate()
            .map(|(i, f)| TimeEntry {
                i: i as u64,
                t: round_time(f.normalized_time),
            })
            .collect();

        let ap = index.is_present().then(|| AppearanceEntry {
            d: index.dark.map(|v| v as u64),
            l: index.light.map(|v| v as u64),
        });

        Self { ap, ti }
    }

    /// Serialize as a binary property list (`bplist00`).
    pub fn to_binary_plist(&self) -> DynwallResult<Vec<u8>> {
        let mut out = Vec::new();
        plist::to_writer_binary(&mut out, self)
            .map_err(|e| DynwallError::metadata(format!("serialize binary plist: {e}")))?;
        Ok(out)
    }

    /// Parse a property list (binary or XML) back into a payload.
    pub fn from_plist_bytes(bytes: &[u8]) -> DynwallResult<Self> {
        plist::from_bytes(bytes)
            .map_err(|e| DynwallError::metadata(format!("parse property list: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/payload.rs"]
mod tests;
