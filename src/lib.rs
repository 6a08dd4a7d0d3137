//! Decoders for the Rise of the Triad asset archive (WAD) and level archive
//! (RTL/RTC) formats.

pub mod codec;
pub mod common;
pub mod error;
pub mod lump;
pub mod rtl;
pub mod wad;

pub use common::{palette_from_bytes, ByteSource, Palette};
pub use error::{BinParse, BinParseResult};
