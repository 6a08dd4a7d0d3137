use std::boxed::Box;
use std::sync::Arc;
use std::vec::Vec;

use crate::common::Palette;

/// What a lump was decoded as.  `Unresolved` lumps have no payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    Unresolved,
    Wall,
    FloorCeiling,
    Sky,
    Font,
    Picture,
    Patch,
    Lbm,
    Raw,
}

/// Row-major, palette-indexed image with an optional opacity mask of the
/// same dimensions
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
    mask: Option<Box<[u8]>>,
    palette: Option<Arc<Palette>>,
}

impl Image {
    pub fn new(width: u32, height: u32, pixels: Box<[u8]>) -> Self {
        assert_eq!(
            pixels.len() as u64,
            u64::from(width) * u64::from(height),
            "Pixel count != width * height"
        );

        Image {
            width,
            height,
            pixels,
            mask: None,
            palette: None,
        }
    }

    pub fn with_mask(mut self, mask: Box<[u8]>) -> Self {
        assert_eq!(mask.len(), self.pixels.len(), "Mask size != image size");
        self.mask = Some(mask);
        self
    }

    pub fn with_palette(mut self, palette: Arc<Palette>) -> Self {
        self.palette = Some(palette);
        self
    }

    pub(crate) fn with_palette_opt(
        self,
        palette: Option<&Arc<Palette>>,
    ) -> Self {
        match palette {
            Some(palette) => self.with_palette(Arc::clone(palette)),
            None => self,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..]
    }

    pub fn mask(&self) -> Option<&[u8]> {
        self.mask.as_deref()
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }

    /// Palette index at (`x`, `y`)
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Opacity at (`x`, `y`); fully opaque when the image has no mask
    pub fn opacity(&self, x: u32, y: u32) -> Option<u8> {
        let i = self.offset(x, y)?;
        Some(self.mask.as_ref().map_or(255, |mask| mask[i]))
    }

    /// Expand to 8-bit RGBA through the attached palette, using the mask as
    /// alpha.  `None` if no palette is attached.
    pub fn to_rgba(&self) -> Option<Vec<u8>> {
        let palette = self.palette.as_deref()?;
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);

        for (i, &index) in self.pixels.iter().enumerate() {
            rgba.extend(palette[usize::from(index)]);
            rgba.push(self.mask.as_ref().map_or(255, |mask| mask[i]));
        }

        Some(rgba)
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }
}

/// Flat floor or ceiling tile with its origin
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FloorCeiling {
    pub(crate) image: Image,
    pub(crate) origin_x: i16,
    pub(crate) origin_y: i16,
}

impl FloorCeiling {
    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn origin(&self) -> (i16, i16) {
        (self.origin_x, self.origin_y)
    }
}

/// Bitmap font: one optional glyph per character code
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Font {
    pub(crate) height: u16,
    pub(crate) colour: Option<i16>,
    pub(crate) glyphs: Vec<Option<Image>>,
    pub(crate) palette: Option<Box<Palette>>,
}

impl Font {
    pub const GLYPH_COUNT: usize = 256;

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Colour index stored ahead of a coloured font's header
    pub fn colour(&self) -> Option<i16> {
        self.colour
    }

    pub fn glyph(&self, code: u8) -> Option<&Image> {
        self.glyphs[usize::from(code)].as_ref()
    }

    pub fn glyphs(&self) -> &[Option<Image>] {
        &self.glyphs[..]
    }

    /// Palette carried inside a coloured font
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }
}

/// Sprite patch decoded from column runs
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Patch {
    pub(crate) image: Image,
    pub(crate) orig_size: i16,
    pub(crate) width: i16,
    pub(crate) height: i16,
    pub(crate) left_offset: i16,
    pub(crate) top_offset: i16,
    pub(crate) translevel: Option<u16>,
}

impl Patch {
    /// Image on the full canvas, opacity mask included
    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn orig_size(&self) -> i16 {
        self.orig_size
    }

    /// Bounding box size from the header
    pub fn size(&self) -> (i16, i16) {
        (self.width, self.height)
    }

    pub fn offsets(&self) -> (i16, i16) {
        (self.left_offset, self.top_offset)
    }

    pub fn translevel(&self) -> Option<u16> {
        self.translevel
    }
}

/// Decoded contents of a lump
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Payload {
    Wall(Image),
    FloorCeiling(FloorCeiling),
    Sky(Image),
    Font(Font),
    Picture(Image),
    Patch(Patch),
    Lbm(Image),
    Raw(Box<[u8]>),
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Payload::Wall(_) => Kind::Wall,
            Payload::FloorCeiling(_) => Kind::FloorCeiling,
            Payload::Sky(_) => Kind::Sky,
            Payload::Font(_) => Kind::Font,
            Payload::Picture(_) => Kind::Picture,
            Payload::Patch(_) => Kind::Patch,
            Payload::Lbm(_) => Kind::Lbm,
            Payload::Raw(_) => Kind::Raw,
        }
    }

    /// The single image of an image-like payload
    pub fn image(&self) -> Option<&Image> {
        match self {
            Payload::Wall(img)
            | Payload::Sky(img)
            | Payload::Picture(img)
            | Payload::Lbm(img) => Some(img),
            Payload::FloorCeiling(flat) => Some(&flat.image),
            Payload::Patch(patch) => Some(&patch.image),
            Payload::Font(_) | Payload::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Payload::Raw(bytes) => Some(&bytes[..]),
            _ => None,
        }
    }
}
