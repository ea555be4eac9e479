use std::path::{Path, PathBuf};

use crate::assemble::codec::ImageCodec;
use crate::assemble::container::{assemble_container, ensure_sources_exist};
use crate::assemble::heif::HeifCodec;
use crate::encode::xmp::encode_schedule;
use crate::foundation::config::BuildOpts;
use crate::foundation::error::{DynwallError, DynwallResult};
use crate::schedule::manifest::load_manifest;

/// Build a dynamic wallpaper from the manifest at `manifest_path` with the default codec.
pub fn build_dynamic_wallpaper(
    manifest_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    opts: BuildOpts,
) -> DynwallResult<PathBuf> {
    build_with_codec(manifest_path, out_path, opts, &HeifCodec::new())
}

/// Build with an explicit image collaborator.
///
/// Manifest, schedule and metadata failures happen before anything is written; the container
/// write is the last fallible step.
#[tracing::instrument(skip_all, fields(manifest = %manifest_path.as_ref().display()))]
pub fn build_with_codec(
    manifest_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
    opts: BuildOpts,
    codec: &dyn ImageCodec,
) -> DynwallResult<PathBuf> {
    opts.validate()?;

    let (schedule, index) = load_manifest(manifest_path)?;
    if schedule.len() < 2 {
        return Err(DynwallError::InsufficientFrames(schedule.len()));
    }
    tracing::debug!(
        frames = schedule.len(),
        light = ?index.light,
        dark = ?index.dark,
        "loaded schedule"
    );

    ensure_sources_exist(&schedule)?;
    let xmp = encode_schedule(&schedule, index)?;

    assemble_container(&schedule, &xmp, out_path.as_ref(), opts, codec)
}
