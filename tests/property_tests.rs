//! Randomized checks of the codec round trips and of decoder robustness

use proptest::prelude::*;
use rott_util::codec::{column, packbits, rlew};
use rott_util::rtl::semantics::{shift, Direction};
use rott_util::rtl::LAYER_SIZE;

proptest! {
    #[test]
    fn rlew_round_trip(
        words in prop::collection::vec(any::<u16>(), 0..2000),
        tag in any::<u16>()
    ) {
        let encoded = rlew::encode(&words, tag);
        let decoded = rlew::decode(&encoded, tag).unwrap();
        prop_assert_eq!(&words[..], &decoded[..]);
    }
}

proptest! {
    #[test]
    fn rlew_round_trip_long_runs(
        value in any::<u16>(),
        count in 0..70000usize,
        tag in any::<u16>()
    ) {
        let words = vec![value; count];
        let decoded = rlew::decode(&rlew::encode(&words, tag), tag).unwrap();
        prop_assert_eq!(words, decoded);
    }
}

proptest! {
    #[test]
    fn rlew_decode_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..500),
        tag in any::<u16>()
    ) {
        let _ = rlew::decode(&data, tag);
    }
}

proptest! {
    #[test]
    fn column_transpose_round_trip(
        (width, height, src) in (1..64usize, 1..64usize)
            .prop_flat_map(|(w, h)| {
                (Just(w), Just(h), prop::collection::vec(any::<u8>(), w * h))
            })
    ) {
        let rows = column::transpose(&src, width, height).unwrap();
        let columns = column::transpose(&rows, height, width).unwrap();
        prop_assert_eq!(&src[..], &columns[..]);
    }
}

proptest! {
    #[test]
    fn packbits_round_trip(
        data in prop::collection::vec(any::<u8>(), 0..2000)
    ) {
        let packed = packbits::pack(&data);
        let unpacked = packbits::unpack(&packed, data.len()).unwrap();
        prop_assert_eq!(&data[..], &unpacked[..]);
    }
}

proptest! {
    #[test]
    fn packbits_round_trip_runs(
        runs in prop::collection::vec((any::<u8>(), 1..300usize), 1..20)
    ) {
        let data: Vec<u8> = runs
            .iter()
            .flat_map(|&(value, count)| std::iter::repeat(value).take(count))
            .collect();
        let packed = packbits::pack(&data);
        let unpacked = packbits::unpack(&packed, data.len()).unwrap();
        prop_assert_eq!(data, unpacked);
    }
}

proptest! {
    #[test]
    fn packbits_unpack_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..500),
        out_len in 0..1000usize
    ) {
        if let Ok(out) = packbits::unpack(&data, out_len) {
            prop_assert_eq!(out.len(), out_len);
        }
    }
}

proptest! {
    #[test]
    fn shift_stays_on_map(
        index in 0..LAYER_SIZE,
        dir in prop::sample::select(vec![
            Direction::Right,
            Direction::Up,
            Direction::Left,
            Direction::Down,
        ]),
        distance in 0..300usize
    ) {
        let moved = shift(index, dir, distance);
        prop_assert!(moved < LAYER_SIZE);

        if moved != 0 && distance > 0 {
            prop_assert_eq!(shift(moved, dir.opposite(), distance), index);
        }
    }
}
