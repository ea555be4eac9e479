use std::path::Path;

use crate::assemble::codec::{DecodedImage, ImageCodec, SequenceRequest, decode_with_image};
use crate::foundation::error::{DynwallError, DynwallResult};

/// Default image collaborator: `image` crate decoding, HEIF (HEVC) container output.
///
/// Encoding links against libheif and is only available with the `heif` cargo feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeifCodec;

impl HeifCodec {
    /// Create the codec.
    pub fn new() -> Self {
        Self
    }

    /// Whether this build can write HEIF containers.
    pub fn can_encode() -> bool {
        cfg!(feature = "heif")
    }
}

impl ImageCodec for HeifCodec {
    fn decode(&self, path: &Path) -> DynwallResult<DecodedImage> {
        decode_with_image(path)
    }

    #[cfg(feature = "heif")]
    fn encode_sequence(&self, request: &SequenceRequest<'_>) -> DynwallResult<Vec<u8>> {
        libheif::encode(request)
    }

    #[cfg(not(feature = "heif"))]
    fn encode_sequence(&self, _request: &SequenceRequest<'_>) -> DynwallResult<Vec<u8>> {
        Err(DynwallError::codec(
            "HEIF encoding is not available in this build (rebuild with `--features heif`)",
        ))
    }
}

#[cfg(feature = "heif")]
mod libheif {
    use libheif_rs::{
        Channel, ColorSpace, CompressionFormat, EncoderQuality, HeifContext, Image, LibHeif,
        RgbChroma,
    };

    use super::*;
    use crate::assemble::codec::ContainerFrame;

    fn heif_err(what: &str) -> impl Fn(libheif_rs::HeifError) -> DynwallError + '_ {
        move |e| DynwallError::codec(format!("{what}: {e}"))
    }

    pub(super) fn encode(request: &SequenceRequest<'_>) -> DynwallResult<Vec<u8>> {
        let lib = LibHeif::new();
        let mut ctx = HeifContext::new().map_err(heif_err("create HEIF context"))?;
        let mut encoder = lib
            .encoder_for_format(CompressionFormat::Hevc)
            .map_err(heif_err("find HEVC encoder"))?;
        encoder
            .set_quality(EncoderQuality::Lossy(request.quality))
            .map_err(heif_err("set encoder quality"))?;

        let mut handles = Vec::with_capacity(1 + request.append.len());
        for frame in request.frames() {
            let image = to_heif_image(frame)?;
            let handle = ctx
                .encode_image(&image, &mut encoder, None)
                .map_err(heif_err("encode image"))?;
            if let Some(xmp) = frame.xmp.as_deref() {
                ctx.add_xmp_metadata(&handle, xmp)
                    .map_err(heif_err("attach XMP"))?;
            }
            handles.push(handle);
        }

        let primary = handles
            .get_mut(request.primary_index)
            .ok_or_else(|| DynwallError::codec("primary index out of range"))?;
        ctx.set_primary_image(primary)
            .map_err(heif_err("set primary image"))?;

        ctx.write_to_bytes().map_err(heif_err("write HEIF"))
    }

    fn to_heif_image(frame: &ContainerFrame) -> DynwallResult<Image> {
        let (width, height) = frame.pixels.dimensions();
        let mut image = Image::new(width, height, ColorSpace::Rgb(RgbChroma::Rgb))
            .map_err(heif_err("allocate HEIF image"))?;
        image
            .create_plane(Channel::Interleaved, width, height, 8)
            .map_err(heif_err("allocate HEIF plane"))?;

        let planes = image.planes_mut();
        let plane = planes
            .interleaved
            .ok_or_else(|| DynwallError::codec("HEIF image has no interleaved plane"))?;
        let row_len = width as usize * 3;
        let src = frame.pixels.as_raw();
        for (y, row) in src.chunks_exact(row_len).enumerate() {
            let start = y * plane.stride;
            plane.data[start..start + row_len].copy_from_slice(row);
        }

        Ok(image)
    }
}
