//! PNG encoding for externalized and embedded crops.

use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use scene_types::CroppedImage;

use crate::document::InlineImage;

/// `frame{frame}.png`
pub fn frame_image_name(frame: usize) -> String {
    format!("frame{frame}.png")
}

/// `bp{body_part}-frame{frame}.png`
pub fn body_part_image_name(body_part: usize, frame: usize) -> String {
    format!("bp{body_part}-frame{frame}.png")
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

pub fn decode_png(bytes: &[u8]) -> Result<RgbImage, image::ImageError> {
    Ok(image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8())
}

pub fn read_png(path: &Path) -> Result<RgbImage, image::ImageError> {
    Ok(image::open(path)?.to_rgb8())
}

pub fn to_inline(crop: &CroppedImage) -> Result<InlineImage, image::ImageError> {
    Ok(InlineImage {
        data: STANDARD.encode(encode_png(&crop.image)?),
        offset: crop.offset,
        size: crop.size,
    })
}

/// Decode an embedded crop. Errors are reported as strings since they mix
/// base64 and PNG failures.
pub fn from_inline(inline: &InlineImage) -> Result<CroppedImage, String> {
    let bytes = STANDARD.decode(&inline.data).map_err(|e| e.to_string())?;
    let image = decode_png(&bytes).map_err(|e| e.to_string())?;
    Ok(CroppedImage {
        image,
        offset: inline.offset,
        size: inline.size,
    })
}
