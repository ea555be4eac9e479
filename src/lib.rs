//! dynwall turns a set of time-tagged still images into a dynamic wallpaper: one multi-image
//! HEIF container whose primary image carries an `apple_desktop:h24` XMP attribute describing
//! when each image is shown during the day and which images suit light and dark mode.
//!
//! # Pipeline overview
//!
//! 1. **Load**: JSON manifest -> [`FrameSchedule`] + [`AppearanceIndex`]
//! 2. **Encode**: schedule -> binary property list -> base64 -> XMP packet
//! 3. **Assemble**: decode images through an [`ImageCodec`], normalize size, write the container
//!
//! A frame's position in the sorted schedule is the index written into the metadata and the
//! index of its image in the container.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assemble;
mod build;
mod encode;
mod foundation;
mod schedule;

pub use assemble::codec::{
    ContainerFrame, DecodedImage, ImageCodec, SequenceRequest, decode_with_image, to_upright_rgb8,
};
pub use assemble::container::{assemble_container, ensure_sources_exist};
pub use assemble::heif::HeifCodec;
pub use build::{build_dynamic_wallpaper, build_with_codec};
pub use encode::payload::{AppearanceEntry, MetadataPayload, TimeEntry, round_time};
pub use encode::xmp::{APPLE_DESKTOP_NS, decode_metadata, encode_schedule, wrap_xmp};
pub use foundation::config::{BuildOpts, DEFAULT_QUALITY, ResizeMode};
pub use foundation::error::{DynwallError, DynwallResult};
pub use schedule::manifest::{load_manifest, parse_manifest, resolve_appearance};
pub use schedule::model::{Appearance, AppearanceIndex, Frame, FrameSchedule};
pub use schedule::time::{END_OF_DAY, parse_time_fraction};
