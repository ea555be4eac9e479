use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder as _, ImageReader, RgbImage};

use crate::foundation::error::{DynwallError, DynwallResult};

/// Decoded source image before orientation correction.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Pixels exactly as stored in the file.
    pub image: DynamicImage,
    /// Embedded EXIF orientation, [`Orientation::NoTransforms`] when absent.
    pub orientation: Orientation,
}

/// One image handed to the container encoder.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerFrame {
    /// Upright 8-bit RGB pixels.
    pub pixels: RgbImage,
    /// XMP packet to attach to this image, if any.
    pub xmp: Option<Vec<u8>>,
}

/// Arguments of a multi-image container encode.
#[derive(Clone, Copy, Debug)]
pub struct SequenceRequest<'a> {
    /// First image; carries the schedule metadata.
    pub primary: &'a ContainerFrame,
    /// Remaining images in schedule order.
    pub append: &'a [ContainerFrame],
    /// Encoder quality, `1..=100`.
    pub quality: u8,
    /// Index of the image the container marks as primary.
    pub primary_index: usize,
}

impl SequenceRequest<'_> {
    /// All images in container order.
    pub fn frames(&self) -> impl Iterator<Item = &ContainerFrame> {
        std::iter::once(self.primary).chain(self.append.iter())
    }
}

/// Image collaborator used by the assembler.
///
/// Implementations decode source files and encode the final multi-image container; they hold
/// no per-build state.
pub trait ImageCodec {
    /// Decode the image at `path`.
    fn decode(&self, path: &Path) -> DynwallResult<DecodedImage>;

    /// Encode a multi-image container and return its bytes.
    fn encode_sequence(&self, request: &SequenceRequest<'_>) -> DynwallResult<Vec<u8>>;
}

/// Decode any format the `image` crate understands, reporting its EXIF orientation.
pub fn decode_with_image(path: &Path) -> DynwallResult<DecodedImage> {
    let codec_err =
        |e: image::ImageError| DynwallError::codec(format!("decode '{}': {e}", path.display()));

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| DynwallError::codec(format!("open '{}': {e}", path.display())))?;
    let mut decoder = reader.into_decoder().map_err(codec_err)?;
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let image = DynamicImage::from_decoder(decoder).map_err(codec_err)?;

    Ok(DecodedImage { image, orientation })
}

/// Apply orientation and flatten to 8-bit RGB.
pub fn to_upright_rgb8(decoded: DecodedImage) -> RgbImage {
    let DecodedImage {
        mut image,
        orientation,
    } = decoded;
    image.apply_orientation(orientation);
    image.into_rgb8()
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/codec.rs"]
mod tests;
