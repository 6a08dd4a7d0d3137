use super::column::{decode_image, opacity_mask, transpose};
use crate::error;

#[test]
fn transpose_two_by_three() {
    // columns: [1 2 3] [4 5 6]
    let src = [1u8, 2, 3, 4, 5, 6];
    let pixels = transpose(&src, 2, 3).unwrap();
    assert_eq!(&pixels[..], &[1, 4, 2, 5, 3, 6]);
}

#[test]
fn transpose_ignores_trailing_bytes() {
    let src = [1u8, 2, 3, 4, 99];
    let pixels = transpose(&src, 2, 2).unwrap();
    assert_eq!(&pixels[..], &[1, 3, 2, 4]);
}

#[test]
fn transpose_short_source() {
    let e = transpose(&[0u8; 5], 2, 3).unwrap_err();
    assert!(matches!(e, error::BinParse::Truncated { .. }));
}

#[test]
fn mask_marks_transparent_index() {
    let mask = opacity_mask(&[0, 5, 0, 7], 0);
    assert_eq!(&mask[..], &[0, 255, 0, 255]);
}

#[test]
fn decode_image_without_transparency() {
    let image = decode_image(&[0u8, 1, 2, 3], 2, 2, None).unwrap();
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.pixels(), &[0, 2, 1, 3]);
    assert!(image.mask().is_none());
}

#[test]
fn decode_image_with_transparency() {
    let image = decode_image(&[0u8, 1, 2, 0], 2, 2, Some(0)).unwrap();
    assert_eq!(image.mask().unwrap(), &[0, 255, 255, 0]);
}
