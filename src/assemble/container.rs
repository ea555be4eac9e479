use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbImage;
use image::imageops::{self, FilterType};

use crate::assemble::codec::{ContainerFrame, ImageCodec, SequenceRequest, to_upright_rgb8};
use crate::foundation::config::{BuildOpts, ResizeMode};
use crate::foundation::error::{DynwallError, DynwallResult};
use crate::schedule::model::FrameSchedule;

/// Fail with [`DynwallError::ImageNotFound`] for the first schedule entry whose file is missing.
pub fn ensure_sources_exist(schedule: &FrameSchedule) -> DynwallResult<()> {
    match schedule.frames().iter().find(|f| !f.image_path.exists()) {
        Some(missing) => Err(DynwallError::ImageNotFound(missing.image_path.clone())),
        None => Ok(()),
    }
}

/// Decode every frame, normalize sizes and write the container to `out_path`.
///
/// Images enter the container in schedule order; `xmp` is attached to the first one, which is
/// also marked primary. Returns the absolute output path.
#[tracing::instrument(skip(schedule, xmp, codec), fields(frames = schedule.len()))]
pub fn assemble_container(
    schedule: &FrameSchedule,
    xmp: &[u8],
    out_path: &Path,
    opts: BuildOpts,
    codec: &dyn ImageCodec,
) -> DynwallResult<PathBuf> {
    opts.validate()?;

    let mut pixels: Vec<RgbImage> = Vec::with_capacity(schedule.len());
    let mut target: Option<(u32, u32)> = None;

    for frame in schedule.frames() {
        if !frame.image_path.exists() {
            return Err(DynwallError::ImageNotFound(frame.image_path.clone()));
        }

        let rgb = to_upright_rgb8(codec.decode(&frame.image_path)?);
        let size = rgb.dimensions();
        tracing::debug!(
            path = %frame.image_path.display(),
            width = size.0,
            height = size.1,
            "decoded frame"
        );

        let rgb = match target {
            None => {
                target = Some(size);
                rgb
            }
            Some(t) if t == size => rgb,
            Some((w, h)) => match opts.resize_mode {
                ResizeMode::Fit => {
                    tracing::debug!(from = ?size, to = ?(w, h), "resizing frame");
                    imageops::resize(&rgb, w, h, FilterType::Lanczos3)
                }
                ResizeMode::Strict => {
                    return Err(DynwallError::SizeMismatch(format!(
                        "'{}' is {}x{}, expected {w}x{h}",
                        frame.image_path.display(),
                        size.0,
                        size.1
                    )));
                }
            },
        };
        pixels.push(rgb);
    }

    let mut frames = pixels.into_iter().map(|p| ContainerFrame {
        pixels: p,
        xmp: None,
    });
    let mut primary = frames
        .next()
        .ok_or(DynwallError::InsufficientFrames(0))?;
    primary.xmp = Some(xmp.to_vec());
    let append: Vec<ContainerFrame> = frames.collect();

    let bytes = codec.encode_sequence(&SequenceRequest {
        primary: &primary,
        append: &append,
        quality: opts.quality,
        primary_index: 0,
    })?;
    drop(append);
    drop(primary);

    let out_path = std::path::absolute(out_path)
        .with_context(|| format!("resolve output path '{}'", out_path.display()))?;
    write_replacing(&out_path, &bytes)?;

    tracing::info!(path = %out_path.display(), bytes = bytes.len(), "wrote container");
    Ok(out_path)
}

/// Write through a sibling temp file and rename over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> DynwallResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(format!(".{}.partial", std::process::id()));
    let tmp = path.with_file_name(tmp_name);

    let written = std::fs::write(&tmp, bytes)
        .with_context(|| format!("write '{}'", tmp.display()))
        .and_then(|()| {
            std::fs::rename(&tmp, path)
                .with_context(|| format!("replace '{}'", path.display()))
        });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/container.rs"]
mod tests;
