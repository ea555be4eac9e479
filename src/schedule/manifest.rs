use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use serde_json::Value;

use crate::foundation::error::{DynwallError, DynwallResult};
use crate::schedule::model::{Appearance, AppearanceIndex, Frame, FrameSchedule};
use crate::schedule::time::parse_time_fraction;

/// One entry of the manifest's `frames` array as written by the user.
#[derive(Debug, Deserialize)]
struct FrameDef {
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    time: Option<Value>,
    #[serde(default)]
    appearance: Option<Value>,
    #[serde(default)]
    light: Option<Value>,
    #[serde(default)]
    dark: Option<Value>,
}

impl FrameDef {
    fn source(&self) -> Option<&str> {
        self.file
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.image.as_deref())
    }

    /// Text handed to the time parser; non-string scalars use their JSON form.
    fn time_text(&self) -> Option<String> {
        match self.time.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Resolve a frame's appearance tag.
///
/// Precedence: an `appearance` string (trimmed, case-folded, must be `light` or `dark`), then
/// `light == true`, then `dark == true`, else untagged. Once a string is present the flags are
/// not consulted, so a blank string is rejected rather than falling through.
pub fn resolve_appearance(
    explicit: Option<&str>,
    light_flag: bool,
    dark_flag: bool,
) -> DynwallResult<Option<Appearance>> {
    if let Some(raw) = explicit {
        let folded = raw.trim().to_lowercase();
        return match folded.as_str() {
            "light" => Ok(Some(Appearance::Light)),
            "dark" => Ok(Some(Appearance::Dark)),
            _ => Err(DynwallError::InvalidAppearance(raw.to_owned())),
        };
    }
    if light_flag {
        return Ok(Some(Appearance::Light));
    }
    if dark_flag {
        return Ok(Some(Appearance::Dark));
    }
    Ok(None)
}

/// Parse a manifest document; relative image paths resolve against `base_dir`.
pub fn parse_manifest(
    text: &str,
    base_dir: &Path,
) -> DynwallResult<(FrameSchedule, AppearanceIndex)> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| DynwallError::ManifestParse(e.to_string()))?;

    let Some(frames_value) = doc.as_object().and_then(|o| o.get("frames")) else {
        return Err(DynwallError::ManifestShape(
            "manifest must be a JSON object with a 'frames' array".to_owned(),
        ));
    };
    let entries = match frames_value.as_array() {
        Some(a) if !a.is_empty() => a,
        _ => {
            return Err(DynwallError::ManifestShape(
                "manifest 'frames' must be a non-empty list".to_owned(),
            ));
        }
    };

    let mut frames = Vec::with_capacity(entries.len());
    for (n, entry) in entries.iter().enumerate() {
        frames.push(parse_frame(n, entry, base_dir)?);
    }

    let schedule = FrameSchedule::new(frames)?;
    let index = schedule.appearance_index();
    Ok((schedule, index))
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: impl AsRef<Path>) -> DynwallResult<(FrameSchedule, AppearanceIndex)> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DynwallError::ManifestNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("read manifest '{}'", path.display()))
                .into());
        }
    };

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_manifest(&text, base_dir)
}

fn parse_frame(n: usize, entry: &Value, base_dir: &Path) -> DynwallResult<Frame> {
    if !entry.is_object() {
        return Err(DynwallError::FrameShape(format!(
            "frame #{n} must be a JSON object"
        )));
    }
    let def = FrameDef::deserialize(entry)
        .map_err(|e| DynwallError::FrameShape(format!("frame #{n}: {e}")))?;

    let (Some(source), Some(time)) = (def.source(), def.time_text()) else {
        return Err(DynwallError::MissingField(format!(
            "frame #{n} requires 'file' (or 'image') and 'time'"
        )));
    };

    let image_path = resolve_image_path(source, base_dir)?;
    let normalized_time = parse_time_fraction(&time)?;

    let explicit = def.appearance.as_ref().and_then(Value::as_str);
    let is_true = |v: &Option<Value>| matches!(v, Some(Value::Bool(true)));
    let appearance = resolve_appearance(explicit, is_true(&def.light), is_true(&def.dark))?;

    Ok(Frame {
        image_path,
        normalized_time,
        appearance,
    })
}

fn resolve_image_path(source: &str, base_dir: &Path) -> DynwallResult<PathBuf> {
    let p = Path::new(source);
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let joined = base_dir.join(p);
    let abs = std::path::absolute(&joined)
        .with_context(|| format!("resolve image path '{}'", joined.display()))?;
    Ok(abs)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/manifest.rs"]
mod tests;
