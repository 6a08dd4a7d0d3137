use std::mem::size_of;
use std::string::String;

use crate::common::name_from_bytes;
use crate::error::{BinParse, BinParseResult};

pub const SIGNATURES: [[u8; 4]; 2] = [*b"RTL\0", *b"RTC\0"];

/// Every level archive has exactly this many slot headers, used or not
pub const SLOT_COUNT: usize = 100;

pub const MAP_WIDTH: usize = 128;
pub const MAP_HEIGHT: usize = 128;

/// Cells in one tile layer
pub const LAYER_SIZE: usize = MAP_WIDTH * MAP_HEIGHT;

pub const LAYER_COUNT: usize = 3;

const SLOT_USED: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Layer {
    Walls = 0,
    Sprites,
    Info,
}

impl Layer {
    pub const ALL: [Layer; LAYER_COUNT] =
        [Layer::Walls, Layer::Sprites, Layer::Info];
}

impl From<Layer> for usize {
    fn from(layer: Layer) -> Self {
        layer as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct Head {
    signature: [u8; 4],
    version: i32,
}

impl Head {
    pub const SIZE: usize = size_of::<Head>();

    pub fn new(signature: [u8; 4], version: i32) -> Self {
        Head { signature, version }
    }

    pub fn signature(&self) -> [u8; 4] {
        self.signature
    }

    pub fn version(&self) -> i32 {
        self.version
    }
}

impl TryFrom<[u8; size_of::<Head>()]> for Head {
    type Error = BinParse;

    fn try_from(bytes: [u8; size_of::<Head>()]) -> BinParseResult<Head> {
        let signature = [bytes[0], bytes[1], bytes[2], bytes[3]];

        if !SIGNATURES.contains(&signature) {
            return Err(BinParse::format(format!(
                "Unrecognized level archive signature {:?}",
                signature,
            )));
        }

        Ok(Head {
            signature,
            version: i32::from_le_bytes([
                bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        })
    }
}

/// Where one layer's compressed words sit in the file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSpan {
    pub offset: u32,
    pub length: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, packed)]
pub struct SlotHeader {
    used: u32,
    crc: u32,
    rlew_tag: u32,
    specials: u32,
    offsets: [u32; LAYER_COUNT],
    lengths: [u32; LAYER_COUNT],
    name: [u8; 24],
}

impl SlotHeader {
    pub const SIZE: usize = size_of::<SlotHeader>();

    pub fn new(
        rlew_tag: u32,
        spans: [LayerSpan; LAYER_COUNT],
        name: [u8; 24],
    ) -> Self {
        SlotHeader {
            used: SLOT_USED,
            crc: 0,
            rlew_tag,
            specials: 0,
            offsets: spans.map(|s| s.offset),
            lengths: spans.map(|s| s.length),
            name,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used == SLOT_USED
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn rlew_tag(&self) -> u32 {
        self.rlew_tag
    }

    pub fn specials(&self) -> u32 {
        self.specials
    }

    pub fn layer(&self, layer: Layer) -> LayerSpan {
        let idx: usize = layer.into();
        let (offsets, lengths) = (self.offsets, self.lengths);

        LayerSpan {
            offset: offsets[idx],
            length: lengths[idx],
        }
    }

    pub fn name(&self) -> [u8; 24] {
        self.name
    }

    pub fn name_to_string(&self) -> String {
        name_from_bytes(&self.name)
    }
}

impl From<[u8; size_of::<SlotHeader>()]> for SlotHeader {
    fn from(bytes: [u8; size_of::<SlotHeader>()]) -> Self {
        let mut fields = bytes[..40]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]));
        let mut next = || fields.next().unwrap_or_default();

        let (used, crc, rlew_tag, specials) = (next(), next(), next(), next());
        let offsets = [next(), next(), next()];
        let lengths = [next(), next(), next()];

        let mut name = [0u8; 24];
        name.copy_from_slice(&bytes[40..]);

        SlotHeader {
            used,
            crc,
            rlew_tag,
            specials,
            offsets,
            lengths,
            name,
        }
    }
}
