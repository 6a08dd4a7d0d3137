//! Column-major 8-bit pixel blocks, stored one column after another

use crate::error::{BinParse, BinParseResult};
use crate::lump::Image;
use std::boxed::Box;

/// Rearrange `width * height` column-major pixels from the front of `src`
/// into row-major order
pub fn transpose(
    src: &[u8],
    width: usize,
    height: usize,
) -> BinParseResult<Box<[u8]>> {
    let count = width.checked_mul(height).ok_or_else(|| {
        BinParse::format(format!("Image {width}x{height} too large"))
    })?;

    let src = src.get(..count).ok_or(BinParse::Truncated {
        offset: 0,
        length: count,
        available: src.len(),
    })?;

    let mut pixels = vec![0u8; count].into_boxed_slice();

    for y in 0..height {
        for x in 0..width {
            pixels[y * width + x] = src[x * height + y];
        }
    }

    Ok(pixels)
}

/// Opacity mask with 0 wherever a pixel equals `transparent` and 255
/// elsewhere
pub fn opacity_mask(pixels: &[u8], transparent: u8) -> Box<[u8]> {
    pixels
        .iter()
        .map(|&p| if p == transparent { 0 } else { 255 })
        .collect()
}

/// Decode a column-major block into an image, with an opacity mask when a
/// transparent index is given
pub fn decode_image(
    src: &[u8],
    width: usize,
    height: usize,
    transparent: Option<u8>,
) -> BinParseResult<Image> {
    let pixels = transpose(src, width, height)?;
    let mask = transparent.map(|index| opacity_mask(&pixels, index));
    let image = Image::new(width as u32, height as u32, pixels);

    Ok(match mask {
        Some(mask) => image.with_mask(mask),
        None => image,
    })
}
