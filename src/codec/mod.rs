//! Stream and pixel-layout codecs shared by the lump and level decoders.

pub mod column;
pub mod packbits;
pub mod rlew;

#[cfg(test)]
mod column_test;
