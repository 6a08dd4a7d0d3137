mod parser;
mod repr;

pub mod semantics;

pub use parser::{Level, RtlFile};

pub use repr::{
    Head, Layer, LayerSpan, SlotHeader, LAYER_COUNT, LAYER_SIZE, MAP_HEIGHT,
    MAP_WIDTH, SIGNATURES, SLOT_COUNT,
};

#[cfg(test)]
mod parser_test;

#[cfg(test)]
mod repr_test;
