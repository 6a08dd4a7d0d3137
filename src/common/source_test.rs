use super::{name_from_bytes, palette_from_bytes, ByteSource};
use crate::error;

#[test]
fn read_little_endian_values() {
    let bytes = [0x34, 0x12, 0xFE, 0xFF, 0x78, 0x56, 0x34, 0x12];
    let source = ByteSource::new(&bytes);

    assert_eq!(source.u16_at(0).unwrap(), 0x1234);
    assert_eq!(source.i16_at(2).unwrap(), -2);
    assert_eq!(source.array::<4>(4).unwrap(), [0x78, 0x56, 0x34, 0x12]);
    assert_eq!(source.u8_at(7).unwrap(), 0x12);
    assert_eq!(source.i8_at(2).unwrap(), -2);
}

#[test]
fn reads_do_not_depend_on_order() {
    let bytes = [1u8, 0, 2, 0, 3, 0];
    let source = ByteSource::new(&bytes);

    assert_eq!(source.u16_at(4).unwrap(), 3);
    assert_eq!(source.u16_at(0).unwrap(), 1);
    assert_eq!(source.u16_at(2).unwrap(), 2);
}

#[test]
fn read_past_end() {
    let bytes = [0u8; 5];
    let source = ByteSource::new(&bytes);
    let e = source.array::<4>(2).unwrap_err();

    assert!(matches!(
        e,
        error::BinParse::Truncated {
            offset: 2,
            length: 4,
            available: 5
        }
    ));
}

#[test]
fn slice_offset_overflow() {
    let bytes = [0u8; 5];
    let source = ByteSource::new(&bytes);

    assert!(source.slice(usize::MAX, 2).is_err());
}

#[test]
fn sub_source_is_relative() {
    let bytes = [9u8, 9, 7, 0, 9];
    let source = ByteSource::new(&bytes).sub_source(2, 2).unwrap();

    assert_eq!(source.len(), 2);
    assert_eq!(source.u16_at(0).unwrap(), 7);
    assert!(source.u8_at(2).is_err());
}

#[test]
fn palette_triples() {
    let bytes: Vec<u8> = (0..768u32).map(|i| (i % 256) as u8).collect();
    let palette = palette_from_bytes(&bytes).unwrap();

    assert_eq!(palette[0], [0, 1, 2]);
    assert_eq!(palette[1], [3, 4, 5]);
    assert_eq!(palette[255], [253, 254, 255]);
}

#[test]
fn short_palette() {
    let e = palette_from_bytes(&[0u8; 767]).unwrap_err();
    assert!(matches!(e, error::BinParse::Truncated { .. }));
}

#[test]
fn nul_padded_names() {
    assert_eq!(name_from_bytes(b"WALL1\0\0\0"), "WALL1");
    assert_eq!(name_from_bytes(b"EIGHTCHR"), "EIGHTCHR");
    assert_eq!(name_from_bytes(b"AB\0CD\0\0\0"), "AB");
}
