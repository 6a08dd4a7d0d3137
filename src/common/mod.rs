use std::mem::size_of;
use std::string::String;

use crate::error::{BinParse, BinParseResult};

mod source;

pub use source::ByteSource;

#[cfg(test)]
mod source_test;

pub type Palette = [[u8; 3]; 256];

/// Size of a palette lump on disk (256 RGB triples)
pub const PALETTE_SIZE: usize = size_of::<Palette>();

/// Build a palette from the first 768 bytes of `bytes`
pub fn palette_from_bytes(bytes: &[u8]) -> BinParseResult<Palette> {
    let bytes = bytes.get(..PALETTE_SIZE).ok_or(BinParse::Truncated {
        offset: 0,
        length: PALETTE_SIZE,
        available: bytes.len(),
    })?;

    let mut palette = [[0u8; 3]; 256];

    for (colour, rgb) in palette.iter_mut().zip(bytes.chunks_exact(3)) {
        colour.copy_from_slice(rgb);
    }

    Ok(palette)
}

/// Read a fixed-width, nul-padded name.  Everything from the first nul byte
/// onward is dropped.
pub fn name_from_bytes(slice: &[u8]) -> String {
    let len = slice.iter().position(|&b| b == 0).unwrap_or(slice.len());
    String::from_utf8_lossy(&slice[..len]).into_owned()
}
