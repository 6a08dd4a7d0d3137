use crate::codec::rlew;
use crate::error;
use crate::rtl::semantics::{ClockTime, SwitchLabel, TIMER_SPRITE};
use crate::rtl::{Head, Layer, RtlFile, SlotHeader, LAYER_SIZE, SLOT_COUNT};
use std::vec::Vec;

struct LevelFixture {
    slot: usize,
    tag: u16,
    name: &'static str,
    layers: [Vec<u16>; 3],
}

impl LevelFixture {
    fn new(slot: usize, tag: u16, name: &'static str) -> Self {
        let mut walls = vec![1u16; LAYER_SIZE];
        let mut sprites = vec![0u16; LAYER_SIZE];
        let mut info = vec![0u16; LAYER_SIZE];
        walls[0] = 180;
        sprites[0] = 0x5D;
        info[0] = 7;

        LevelFixture {
            slot,
            tag,
            name,
            layers: [walls, sprites, info],
        }
    }
}

fn slot_offset(slot: usize) -> usize {
    Head::SIZE + slot * SlotHeader::SIZE
}

fn rtl_bytes(signature: &[u8; 4], levels: &[LevelFixture]) -> Vec<u8> {
    let mut out = vec![0u8; slot_offset(SLOT_COUNT)];
    out[..4].copy_from_slice(signature);
    out[4..8].copy_from_slice(&0x0101i32.to_le_bytes());

    for level in levels {
        let mut offsets = [0u32; 3];
        let mut lengths = [0u32; 3];

        for (i, words) in level.layers.iter().enumerate() {
            let packed = rlew::encode(words, level.tag);
            offsets[i] = out.len() as u32;
            lengths[i] = packed.len() as u32;
            out.extend(packed);
        }

        let fields = [1u32, 0x1234, u32::from(level.tag), 0]
            .into_iter()
            .chain(offsets)
            .chain(lengths);

        let at = slot_offset(level.slot);

        for (i, field) in fields.enumerate() {
            let field_at = at + i * 4;
            out[field_at..field_at + 4].copy_from_slice(&field.to_le_bytes());
        }

        let name_at = at + 40;
        out[name_at..name_at + level.name.len()]
            .copy_from_slice(level.name.as_bytes());
    }

    out
}

#[test]
fn parse_empty_archive() {
    let rtl = RtlFile::parse(&rtl_bytes(b"RTC\0", &[])).unwrap();

    assert_eq!(rtl.signature(), *b"RTC\0");
    assert_eq!(rtl.version(), 0x0101);
    assert!(rtl.levels().is_empty());
}

#[test]
fn parse_single_level() {
    let bytes = rtl_bytes(
        b"RTL\0",
        &[LevelFixture::new(2, 0xABCD, "The Gauntlet")],
    );
    let rtl = RtlFile::parse(&bytes).unwrap();

    assert_eq!(rtl.levels().len(), 1);

    let level = rtl.level(2).unwrap();
    assert_eq!(level.index(), 2);
    assert_eq!(level.name(), "The Gauntlet");
    assert_eq!(level.crc(), 0x1234);
    assert_eq!(level.rlew_tag(), 0xABCD);
    assert_eq!(level.header().floor, 1);
    assert_eq!(level.height(), 256);
    assert_eq!(level.song(), 7);

    assert_eq!(level.walls().len(), LAYER_SIZE);
    assert!(level.walls()[..7].iter().all(|&w| w == 0));
    assert_eq!(level.walls()[7], 1);
    assert_eq!(level.cell(Layer::Walls, 0, 1), Some(1));
    assert_eq!(level.cell(Layer::Walls, 128, 0), None);
    assert_eq!(level.cell(Layer::Info, 0, 128), None);
    assert!(rtl.level(0).is_none());
}

#[test]
fn parse_raw_keeps_reserved_cells() {
    let mut fixture = LevelFixture::new(0, 0xABCD, "Raw");
    fixture.layers[1][3] = TIMER_SPRITE;
    fixture.layers[2][3] = 0x0500;

    let rtl = RtlFile::parse_raw(&rtl_bytes(b"RTL\0", &[fixture])).unwrap();
    let level = &rtl.levels()[0];

    assert_eq!(level.walls()[0], 180);
    assert_eq!(level.sprites()[3], TIMER_SPRITE);
    assert_eq!(level.height(), 256);
    assert!(level.timers().is_empty());
    assert!(level.switches().is_empty());
}

#[test]
fn each_slot_uses_its_own_tag() {
    let mut first = LevelFixture::new(0, 0xFEFE, "First");
    let mut second = LevelFixture::new(5, 0x0001, "Second");
    // Each tag is a literal value in the other level
    first.layers[0][100] = 0x0001;
    second.layers[0][100] = 0xFEFE;

    let rtl = RtlFile::parse(&rtl_bytes(b"RTL\0", &[first, second])).unwrap();

    assert_eq!(rtl.levels().len(), 2);
    assert_eq!(rtl.levels()[0].walls()[100], 0x0001);
    assert_eq!(rtl.levels()[1].walls()[100], 0xFEFE);
    assert_eq!(rtl.levels()[1].index(), 5);
}

#[test]
fn overlays_recovered_on_parse() {
    let mut fixture = LevelFixture::new(1, 0xABCD, "Clockwork");
    let [_, sprites, info] = &mut fixture.layers;
    sprites[3] = TIMER_SPRITE;
    info[3] = 0x0500;
    info[5] = 0x0102;
    info[0] = 0x0305;
    info[200] = 0x0101;

    let rtl = RtlFile::parse(&rtl_bytes(b"RTL\0", &[fixture])).unwrap();
    let level = &rtl.levels()[0];
    let timer = level.timer(5).unwrap();

    assert_eq!(timer.start, ClockTime { minutes: 1, seconds: 2 });
    assert_eq!(timer.end, Some(ClockTime { minutes: 3, seconds: 5 }));
    assert_eq!(level.switch_label(129), Some(SwitchLabel::Letter('A')));
    assert_eq!(level.switch_label(5), None);
    // The song is read before the timer pass reuses cell 0
    assert_eq!(level.song(), 0x0305);
}

#[test]
fn unused_flags_contribute_no_level() {
    let mut bytes = rtl_bytes(
        b"RTL\0",
        &[LevelFixture::new(3, 0xABCD, "Skip")],
    );
    bytes[slot_offset(3)] = 2;

    let rtl = RtlFile::parse(&bytes).unwrap();
    assert!(rtl.levels().is_empty());
}

#[test]
fn parse_bad_signature() {
    let err = RtlFile::parse(&rtl_bytes(b"WAD\0", &[])).unwrap_err();
    assert!(matches!(err, error::BinParse::Format(_)));
}

#[test]
fn parse_truncated_slot_table() {
    let bytes = rtl_bytes(b"RTL\0", &[]);
    let err = RtlFile::parse(&bytes[..slot_offset(60) + 10]).unwrap_err();

    assert!(matches!(err, error::BinParse::Truncated { .. }));
}

#[test]
fn parse_layer_outside_file() {
    let mut bytes = rtl_bytes(b"RTL\0", &[LevelFixture::new(0, 0xABCD, "Far")]);
    let info_offset = slot_offset(0) + 24;
    bytes[info_offset..info_offset + 4]
        .copy_from_slice(&u32::MAX.to_le_bytes());

    let err = RtlFile::parse(&bytes).unwrap_err();
    assert!(matches!(err, error::BinParse::Truncated { .. }));
}

#[test]
fn parse_wide_rlew_tag() {
    let mut bytes = rtl_bytes(
        b"RTL\0",
        &[LevelFixture::new(0, 0xABCD, "Wide")],
    );
    let tag_offset = slot_offset(0) + 8;
    bytes[tag_offset..tag_offset + 4]
        .copy_from_slice(&0x1ABCDu32.to_le_bytes());

    let err = RtlFile::parse(&bytes).unwrap_err();
    assert!(matches!(err, error::BinParse::Format(_)));
}

#[test]
fn parse_short_layer() {
    let mut fixture = LevelFixture::new(0, 0xABCD, "Short");
    fixture.layers[2].truncate(LAYER_SIZE - 1);

    let err = RtlFile::parse(&rtl_bytes(b"RTL\0", &[fixture])).unwrap_err();
    assert!(matches!(err, error::BinParse::Format(_)));
}

#[test]
fn parse_layer_ending_mid_run() {
    let mut bytes = rtl_bytes(b"RTL\0", &[LevelFixture::new(0, 0xABCD, "Cut")]);
    // Drop the value word of the wall layer's last run
    let length_at = slot_offset(0) + 28;
    let field = length_at..length_at + 4;
    let length = u32::from_le_bytes(bytes[field.clone()].try_into().unwrap());
    bytes[field].copy_from_slice(&(length - 2).to_le_bytes());

    let err = RtlFile::parse(&bytes).unwrap_err();
    assert!(matches!(err, error::BinParse::Format(_)));
}
