use std::num::IntErrorKind;

use crate::foundation::error::{DynwallError, DynwallResult};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Normalized time of the `24:00` / `24:00:00` end-of-day sentinel.
pub const END_OF_DAY: f64 = 1.0;

/// Parse `HH:MM` or `HH:MM:SS` into a fraction of a 24-hour day.
///
/// Hours must be in `0..24`, minutes and seconds in `0..60`. The only exception is
/// `24:00[:00]`, which maps to exactly [`END_OF_DAY`].
pub fn parse_time_fraction(value: &str) -> DynwallResult<f64> {
    let parts: Vec<&str> = value.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(DynwallError::InvalidTimeFormat(value.to_owned()));
    }

    let component = |s: &str| {
        s.trim().parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                DynwallError::TimeOutOfRange(format!("component '{}' in '{value}'", s.trim()))
            }
            _ => DynwallError::InvalidTimeFormat(value.to_owned()),
        })
    };

    let hours = component(parts[0])?;
    let minutes = component(parts[1])?;
    let seconds = match parts.get(2).copied() {
        Some(s) => component(s)?,
        None => 0,
    };

    if hours == 24 && minutes == 0 && seconds == 0 {
        return Ok(END_OF_DAY);
    }

    if !(0..24).contains(&hours) {
        return Err(DynwallError::TimeOutOfRange(format!(
            "hour {hours} in '{value}'"
        )));
    }
    if !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(DynwallError::TimeOutOfRange(format!(
            "minute/second in '{value}'"
        )));
    }

    let total = hours * 3600 + minutes * 60 + seconds;
    Ok(total as f64 / SECONDS_PER_DAY)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/time.rs"]
mod tests;
