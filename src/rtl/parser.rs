use std::boxed::Box;
use std::path::Path;
use std::string::String;
use std::vec::Vec;

use tracing::{debug, trace};

use crate::codec::rlew;
use crate::common::ByteSource;
use crate::error::{BinParse, BinParseResult};
use crate::rtl::semantics::{
    self, LevelHeader, Overlays, SwitchEntry, SwitchLabel, TimerEntry,
};
use crate::rtl::{Head, Layer, SlotHeader, LAYER_SIZE, MAP_WIDTH, SLOT_COUNT};

/// One used slot of a level archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    index: usize,
    name: String,
    crc: u32,
    rlew_tag: u16,
    specials: u32,
    walls: Box<[u16]>,
    sprites: Box<[u16]>,
    info: Box<[u16]>,
    header: LevelHeader,
    switches: Vec<SwitchEntry>,
    timers: Vec<TimerEntry>,
}

impl Level {
    fn decode(
        source: ByteSource,
        index: usize,
        slot: &SlotHeader,
        process: bool,
    ) -> BinParseResult<Self> {
        let name = slot.name_to_string();
        let rlew_tag = u16::try_from(slot.rlew_tag()).map_err(|_| {
            BinParse::format(format!(
                "Level `{name}` has RLEW tag {:#x} wider than a word",
                slot.rlew_tag()
            ))
        })?;

        trace!("Slot {index} `{name}`: RLEW tag {rlew_tag:#06x}");

        let [walls, sprites, info] =
            Layer::ALL.map(|layer| -> BinParseResult<Box<[u16]>> {
                let span = slot.layer(layer);
                let bytes =
                    source.slice(span.offset as usize, span.length as usize)?;
                let words = rlew::decode(bytes, rlew_tag)?;

                if words.len() != LAYER_SIZE {
                    return Err(BinParse::format(format!(
                        "Level `{name}` {layer:?} layer decodes to {} cells, \
                         expected {LAYER_SIZE}",
                        words.len()
                    )));
                }

                Ok(words.into_boxed_slice())
            });

        let (mut walls, mut sprites, mut info) = (walls?, sprites?, info?);
        let header = LevelHeader::from_layers(&walls, &sprites, &info);

        let Overlays { switches, timers } = if process {
            semantics::interpret(
                &mut walls,
                &mut sprites,
                &mut info,
                header.height,
            )?
        } else {
            Overlays::default()
        };

        Ok(Level {
            index,
            name,
            crc: slot.crc(),
            rlew_tag,
            specials: slot.specials(),
            walls,
            sprites,
            info,
            header,
            switches,
            timers,
        })
    }

    /// Slot number in the archive, 0 to 99
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn rlew_tag(&self) -> u16 {
        self.rlew_tag
    }

    pub fn specials(&self) -> u32 {
        self.specials
    }

    pub fn walls(&self) -> &[u16] {
        &self.walls
    }

    pub fn sprites(&self) -> &[u16] {
        &self.sprites
    }

    pub fn info(&self) -> &[u16] {
        &self.info
    }

    pub fn layer(&self, layer: Layer) -> &[u16] {
        match layer {
            Layer::Walls => &self.walls,
            Layer::Sprites => &self.sprites,
            Layer::Info => &self.info,
        }
    }

    /// Value of `layer` at column `x`, row `y`
    pub fn cell(&self, layer: Layer, x: usize, y: usize) -> Option<u16> {
        if x >= MAP_WIDTH {
            return None;
        }

        self.layer(layer).get(y * MAP_WIDTH + x).copied()
    }

    pub fn header(&self) -> LevelHeader {
        self.header
    }

    /// Wall height in pixels
    pub fn height(&self) -> i32 {
        self.header.height
    }

    pub fn song(&self) -> u16 {
        self.header.song
    }

    /// Switches in the order they were first referenced
    pub fn switches(&self) -> &[SwitchEntry] {
        &self.switches[..]
    }

    pub fn timers(&self) -> &[TimerEntry] {
        &self.timers[..]
    }

    /// Label of the switch at cell `target`
    pub fn switch_label(&self, target: usize) -> Option<SwitchLabel> {
        self.switches
            .iter()
            .find(|s| s.target == target)
            .map(|s| s.label)
    }

    /// Timer controlling the object at cell `target`
    pub fn timer(&self, target: usize) -> Option<&TimerEntry> {
        self.timers.iter().find(|t| t.target == target)
    }
}

/// Parsed level archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RtlFile {
    head: Head,
    levels: Vec<Level>,
}

impl RtlFile {
    pub fn open(path: impl AsRef<Path>) -> BinParseResult<Self> {
        Self::parse(&std::fs::read(path)?)
    }

    /// Decode every used slot and recover its overlays
    pub fn parse(bytes: &[u8]) -> BinParseResult<Self> {
        Self::parse_slots(bytes, true)
    }

    /// Decode every used slot but leave the layers as stored
    pub fn parse_raw(bytes: &[u8]) -> BinParseResult<Self> {
        Self::parse_slots(bytes, false)
    }

    fn parse_slots(bytes: &[u8], process: bool) -> BinParseResult<Self> {
        let source = ByteSource::new(bytes);
        let head = Head::try_from(source.array::<{ Head::SIZE }>(0)?)?;
        let mut levels = Vec::new();

        for index in 0..SLOT_COUNT {
            let offset = Head::SIZE + index * SlotHeader::SIZE;
            let slot = source.array::<{ SlotHeader::SIZE }>(offset)?;
            let slot = SlotHeader::from(slot);

            if !slot.is_used() {
                trace!("Slot {index} unused (flag {})", slot.used());
                continue;
            }

            levels.push(Level::decode(source, index, &slot, process)?);
        }

        debug!(
            "Level archive version {}: {} of {SLOT_COUNT} slots used",
            head.version(),
            levels.len()
        );

        Ok(RtlFile { head, levels })
    }

    pub fn head(&self) -> Head {
        self.head
    }

    pub fn signature(&self) -> [u8; 4] {
        self.head.signature()
    }

    pub fn version(&self) -> i32 {
        self.head.version()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels[..]
    }

    /// Level stored in slot `index`
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.iter().find(|l| l.index == index)
    }
}
