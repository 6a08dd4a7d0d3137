use std::boxed::Box;
use std::sync::Arc;
use std::vec::Vec;

use tracing::{debug, trace};

use crate::codec::{column, packbits};
use crate::common::{palette_from_bytes, ByteSource, Palette, PALETTE_SIZE};
use crate::error::{BinParse, BinParseResult};
use crate::lump::{FloorCeiling, Font, Image, Kind, Patch, Payload};

pub const WALL_SIZE: usize = 4096;
pub const WALL_DIMENSION: usize = 64;
pub const SKY_WIDTH: usize = 256;
pub const SKY_HEIGHT: usize = 200;

/// Lumps that are exactly wall-sized but are not walls
pub const WALL_FALSE_POSITIVES: [&str; 1] = ["SDOOR4A"];

/// Fonts with a leading colour index and an embedded palette
pub const COLOURED_FONTS: [&str; 4] = ["IFNT", "ITNYFONT", "SIFONT", "LIFONT"];

const PATCH_HEAD_SIZE: usize = 10;
const PATCH_MAX_DIMENSION: i32 = 320;
const PATCH_END_OF_COLUMN: u8 = 255;
const PATCH_TRANSLUCENT_RUN: u8 = 254;

/// Decode `bytes` as the requested kind.  `Ok(None)` means the lump does not
/// fit that kind and stays unresolved.  A `Wall` request falls back to a
/// patch for lumps that are not wall-shaped.
pub fn decode(
    name: &str,
    bytes: &[u8],
    kind: Kind,
    palette: Option<&Arc<Palette>>,
) -> BinParseResult<Option<Payload>> {
    let payload = match kind {
        Kind::Unresolved => None,
        Kind::Wall if is_wall(name, bytes.len()) => {
            Some(Payload::Wall(decode_wall(bytes, palette)?))
        }
        Kind::Wall | Kind::Patch => {
            decode_patch(bytes, palette).map(Payload::Patch)
        }
        Kind::FloorCeiling => {
            Some(Payload::FloorCeiling(decode_floor_ceiling(bytes, palette)?))
        }
        Kind::Sky => Some(Payload::Sky(decode_sky(bytes, palette)?)),
        Kind::Font => Some(Payload::Font(decode_font(name, bytes, palette)?)),
        Kind::Picture => decode_picture(bytes, palette).map(Payload::Picture),
        Kind::Lbm => Some(Payload::Lbm(decode_lbm(bytes)?)),
        Kind::Raw => Some(Payload::Raw(read_raw(bytes))),
    };

    trace!(
        "Lump `{name}` requested as {kind:?}, resolved as {:?}",
        payload.as_ref().map_or(Kind::Unresolved, Payload::kind)
    );

    Ok(payload)
}

pub fn is_wall(name: &str, length: usize) -> bool {
    length == WALL_SIZE && !WALL_FALSE_POSITIVES.contains(&name)
}

/// 64x64 column-major wall texture
pub fn decode_wall(
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> BinParseResult<Image> {
    if bytes.len() != WALL_SIZE {
        return Err(BinParse::format(format!(
            "Wall lump must be {WALL_SIZE} bytes, found {}",
            bytes.len()
        )));
    }

    let image =
        column::decode_image(bytes, WALL_DIMENSION, WALL_DIMENSION, None)?;

    Ok(image.with_palette_opt(palette))
}

/// Row-major flat with a width/height/origin header
pub fn decode_floor_ceiling(
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> BinParseResult<FloorCeiling> {
    let source = ByteSource::new(bytes);
    let width = dimension(source.i16_at(0)?, "Floor width")?;
    let height = dimension(source.i16_at(2)?, "Floor height")?;
    let origin_x = source.i16_at(4)?;
    let origin_y = source.i16_at(6)?;

    let pixels = Box::from(source.slice(8, width * height)?);
    let image = Image::new(width as u32, height as u32, pixels)
        .with_palette_opt(palette);

    Ok(FloorCeiling {
        image,
        origin_x,
        origin_y,
    })
}

/// Fixed 256x200 column-major sky
pub fn decode_sky(
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> BinParseResult<Image> {
    let image = column::decode_image(bytes, SKY_WIDTH, SKY_HEIGHT, None)?;
    Ok(image.with_palette_opt(palette))
}

/// Bitmap font.  Glyph offsets are relative to the start of the lump and
/// glyphs are column-major with index 0 transparent.
pub fn decode_font(
    name: &str,
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> BinParseResult<Font> {
    const GLYPHS: usize = Font::GLYPH_COUNT;

    let source = ByteSource::new(bytes);
    let coloured = COLOURED_FONTS.contains(&name);
    let mut cursor = 0usize;

    let colour = if coloured {
        cursor += 2;
        Some(source.i16_at(0)?)
    } else {
        None
    };

    let height = dimension(source.i16_at(cursor)?, "Font height")?;
    cursor += 2;

    let widths_at = cursor;
    cursor += GLYPHS;

    let offsets_at = cursor;
    cursor += GLYPHS * 2;

    let font_palette = if coloured {
        Some(Box::new(palette_from_bytes(source.slice(cursor, PALETTE_SIZE)?)?))
    } else {
        None
    };

    let mut glyphs = Vec::with_capacity(GLYPHS);

    for code in 0..GLYPHS {
        let width = source.i8_at(widths_at + code)?;

        if width <= 0 {
            glyphs.push(None);
            continue;
        }

        let width = width as usize;
        let offset = source.i16_at(offsets_at + code * 2)?;
        let offset = usize::try_from(offset).map_err(|_| {
            BinParse::format(format!(
                "Font `{name}` glyph {code} has negative offset {offset}"
            ))
        })?;

        let block = source.slice(offset, width * height)?;
        let glyph = column::decode_image(block, width, height, Some(0))?;
        glyphs.push(Some(glyph.with_palette_opt(palette)));
    }

    Ok(Font {
        height: height as u16,
        colour,
        glyphs,
        palette: font_palette,
    })
}

/// Picture in either the large layout (8-byte header, rotated column data)
/// or the small layout (2-byte header, four interleaved phases).  `None` if
/// the lump size matches neither.
pub fn decode_picture(
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> Option<Image> {
    decode_large_picture(bytes)
        .or_else(|| decode_small_picture(bytes))
        .map(|image| image.with_palette_opt(palette))
}

fn decode_large_picture(bytes: &[u8]) -> Option<Image> {
    const HEAD_SIZE: usize = 8;

    let source = ByteSource::new(bytes);
    let width = usize::try_from(source.i16_at(0).ok()?).ok()?;
    let height = usize::try_from(source.i16_at(2).ok()?).ok()?;

    if width * height + HEAD_SIZE != bytes.len() {
        return None;
    }

    // Stored as `width` rows of `height` bytes, turned a quarter clockwise
    let src = &bytes[HEAD_SIZE..];
    let mut pixels = vec![0u8; width * height].into_boxed_slice();

    for y in 0..height {
        for x in 0..width {
            pixels[y * width + x] = src[(width - 1 - x) * height + y];
        }
    }

    Some(Image::new(width as u32, height as u32, pixels))
}

fn decode_small_picture(bytes: &[u8]) -> Option<Image> {
    const HEAD_SIZE: usize = 2;
    const PHASES: usize = 4;

    let source = ByteSource::new(bytes);
    let width = usize::from(source.u8_at(0).ok()?) * PHASES;
    let height = usize::from(source.u8_at(1).ok()?);
    let count = width * height;

    // Small pictures carry two to four bytes of trailing padding
    if !(count + 2..=count + 4).contains(&bytes.len()) {
        return None;
    }

    let src = &bytes[HEAD_SIZE..HEAD_SIZE + count];
    let phase_size = count / PHASES;
    let mut pixels = vec![0u8; count].into_boxed_slice();

    for phase in 0..PHASES {
        for pos in 0..phase_size {
            pixels[pos * PHASES + phase] = src[phase * phase_size + pos];
        }
    }

    Some(Image::new(width as u32, height as u32, pixels))
}

/// Sprite patch.  Header values outside the game's bounds, or column data
/// that does not fit, leave the lump unresolved.
pub fn decode_patch(
    bytes: &[u8],
    palette: Option<&Arc<Palette>>,
) -> Option<Patch> {
    match parse_patch(ByteSource::new(bytes)) {
        Ok(mut patch) => {
            patch.image = patch.image.with_palette_opt(palette);
            Some(patch)
        }
        Err(e) => {
            debug!("Not a patch: {e}");
            None
        }
    }
}

fn parse_patch(source: ByteSource) -> BinParseResult<Patch> {
    let orig_size = source.i16_at(0)?;
    let width = source.i16_at(2)?;
    let height = source.i16_at(4)?;
    let left_offset = source.i16_at(6)?;
    let top_offset = source.i16_at(8)?;

    let (orig, w, h, left, top) = (
        i32::from(orig_size),
        i32::from(width),
        i32::from(height),
        i32::from(left_offset),
        i32::from(top_offset),
    );

    if orig > PATCH_MAX_DIMENSION
        || w > PATCH_MAX_DIMENSION
        || h > PATCH_MAX_DIMENSION
        || w > orig
        || -top > orig
        || -left > orig
    {
        return Err(BinParse::format(format!(
            "Patch header out of bounds ({orig} {w}x{h} {left},{top})"
        )));
    }

    let column_count = dimension(width, "Patch width")?;

    // The column table normally starts right after the header, and its
    // first entry then points just past the table.  Anything else there is
    // a translucency level preceding the table.
    let table_end = PATCH_HEAD_SIZE + column_count * 2;
    let first = source.u16_at(PATCH_HEAD_SIZE)?;

    let (translevel, table_at) = if usize::from(first) != table_end {
        (Some(first), PATCH_HEAD_SIZE + 2)
    } else {
        (None, PATCH_HEAD_SIZE)
    };

    let canvas_width = (w - left).max(orig);
    let canvas_height = (h - top).max(orig);

    if canvas_width < 0 || canvas_height < 0 {
        return Err(BinParse::format("Patch canvas has negative size"));
    }

    let area = (canvas_width * canvas_height) as usize;
    let mut pixels = vec![0u8; area].into_boxed_slice();
    let mut mask = vec![0u8; area].into_boxed_slice();

    let column_offsets = (0..column_count)
        .map(|x| source.u16_at(table_at + x * 2).map(usize::from))
        .collect::<BinParseResult<Vec<_>>>()?;

    for (x, &offset) in column_offsets.iter().enumerate() {
        let end = column_offsets.get(x + 1).copied().unwrap_or(source.len());
        let size = end.checked_sub(offset).ok_or_else(|| {
            BinParse::format(format!("Patch column {x} has negative size"))
        })?;
        let column = source.sub_source(offset, size)?;
        let x = x as i32 - left;

        let mut index = 0usize;

        while index + 1 < column.len() {
            let y_start = column.u8_at(index)?;
            let count = usize::from(column.u8_at(index + 1)?);
            index += 2;

            if y_start == PATCH_END_OF_COLUMN {
                break;
            }

            let y_start = i32::from(y_start) - top;
            let translucent = translevel.is_some()
                && column.u8_at(index)? == PATCH_TRANSLUCENT_RUN;

            for dy in 0..count {
                let slot = canvas_slot(
                    (y_start + dy as i32) * canvas_width + x,
                    area,
                )?;

                if translucent {
                    pixels[slot] = 0;
                    mask[slot] = 128;
                } else {
                    pixels[slot] = column.u8_at(index + dy)?;
                    mask[slot] = 255;
                }
            }

            index += if translucent { 1 } else { count };
        }
    }

    let image = Image::new(canvas_width as u32, canvas_height as u32, pixels)
        .with_mask(mask);

    Ok(Patch {
        image,
        orig_size,
        width,
        height,
        left_offset,
        top_offset,
        translevel,
    })
}

// Positions left of the canvas origin count back from the end of the
// canvas, which is where the game's offset sprites expect them.
fn canvas_slot(position: i32, area: usize) -> BinParseResult<usize> {
    let area_signed = area as i64;
    let position = i64::from(position);
    let slot = if position < 0 {
        position + area_signed
    } else {
        position
    };

    if (0..area_signed).contains(&slot) {
        Ok(slot as usize)
    } else {
        Err(BinParse::format(format!(
            "Patch pixel {position} outside canvas of {area}"
        )))
    }
}

/// PackBits-compressed screen with its own palette
pub fn decode_lbm(bytes: &[u8]) -> BinParseResult<Image> {
    const HEAD_SIZE: usize = 4;

    let source = ByteSource::new(bytes);
    let width = dimension(source.i16_at(0)?, "LBM width")?;
    let height = dimension(source.i16_at(2)?, "LBM height")?;
    let palette = palette_from_bytes(source.slice(HEAD_SIZE, PALETTE_SIZE)?)?;

    let packed = &bytes[HEAD_SIZE + PALETTE_SIZE..];
    let pixels = packbits::unpack(packed, width * height)?;

    Ok(Image::new(width as u32, height as u32, pixels.into_boxed_slice())
        .with_palette(Arc::new(palette)))
}

/// Copy the lump's bytes verbatim
pub fn read_raw(bytes: &[u8]) -> Box<[u8]> {
    Box::from(bytes)
}

fn dimension(value: i16, what: &str) -> BinParseResult<usize> {
    usize::try_from(value)
        .map_err(|_| BinParse::format(format!("{what} is negative: {value}")))
}
