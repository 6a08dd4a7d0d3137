use crate::error;
use crate::rtl::{Head, Layer, LayerSpan, SlotHeader, LAYER_SIZE, SLOT_COUNT};
use std::mem::size_of;

#[test]
fn layout_sizes() {
    assert_eq!(size_of::<Head>(), 8);
    assert_eq!(size_of::<SlotHeader>(), 64);
    assert_eq!(LAYER_SIZE, 16384);
    assert_eq!(SLOT_COUNT, 100);
}

#[test]
fn get_layer_as_integer() {
    assert_eq!(usize::from(Layer::Walls), 0);
    assert_eq!(usize::from(Layer::Sprites), 1);
    assert_eq!(usize::from(Layer::Info), 2);
}

#[test]
fn rtl_head_from_bytes() {
    let mut bytes = [0u8; Head::SIZE];
    bytes[..4].copy_from_slice(b"RTL\0");
    bytes[4..].copy_from_slice(&0x0101i32.to_le_bytes());

    let head: Head = bytes.try_into().unwrap();

    assert_eq!(head.signature(), *b"RTL\0");
    assert_eq!(head.version(), 0x0101);
}

#[test]
fn rtc_head_from_bytes() {
    let mut bytes = [0u8; Head::SIZE];
    bytes[..4].copy_from_slice(b"RTC\0");

    let head: Head = bytes.try_into().unwrap();
    assert_eq!(head, Head::new(*b"RTC\0", 0));
}

#[test]
fn bad_head_signature() {
    let mut bytes = [0u8; Head::SIZE];
    bytes[..4].copy_from_slice(b"RTX\0");

    let err = Head::try_from(bytes).unwrap_err();
    assert!(matches!(err, error::BinParse::Format(_)));
}

#[test]
fn slot_header_from_bytes() {
    let mut bytes = [0u8; SlotHeader::SIZE];
    let fields = [1u32, 0xDEAD, 0xABCD, 7, 100, 200, 300, 10, 20, 30];

    for (i, field) in fields.iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&field.to_le_bytes());
    }

    bytes[40..50].copy_from_slice(b"Hall Pass\0");

    let slot = SlotHeader::from(bytes);

    assert!(slot.is_used());
    assert_eq!(slot.crc(), 0xDEAD);
    assert_eq!(slot.rlew_tag(), 0xABCD);
    assert_eq!(slot.specials(), 7);
    assert_eq!(
        slot.layer(Layer::Walls),
        LayerSpan {
            offset: 100,
            length: 10
        }
    );
    assert_eq!(
        slot.layer(Layer::Info),
        LayerSpan {
            offset: 300,
            length: 30
        }
    );
    assert_eq!(slot.name_to_string(), "Hall Pass");
}

#[test]
fn only_flag_one_is_used() {
    let mut bytes = [0u8; SlotHeader::SIZE];
    assert!(!SlotHeader::from(bytes).is_used());

    bytes[0] = 2;
    let slot = SlotHeader::from(bytes);
    assert!(!slot.is_used());
    assert_eq!(slot.used(), 2);
}

#[test]
fn construct_slot_header() {
    let walls = LayerSpan {
        offset: 6408,
        length: 40,
    };
    let sprites = LayerSpan {
        offset: 6448,
        length: 12,
    };
    let info = LayerSpan {
        offset: 6460,
        length: 18,
    };

    let mut name = [0u8; 24];
    name[..4].copy_from_slice(b"Cube");

    let slot = SlotHeader::new(0x4344, [walls, sprites, info], name);

    assert!(slot.is_used());
    assert_eq!(slot.rlew_tag(), 0x4344);
    assert_eq!(slot.layer(Layer::Walls), walls);
    assert_eq!(slot.layer(Layer::Sprites), sprites);
    assert_eq!(slot.layer(Layer::Info), info);
    assert_eq!(slot.name_to_string(), "Cube");
}
