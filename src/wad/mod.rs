mod layout;
mod parser;
mod repr;

pub use layout::{
    FLOOR_CEILING_SECTIONS, MIXED_ATTEMPTS, MIXED_SECTIONS, RAW_SECTIONS,
    SKY_SECTIONS, SPRITE_SECTIONS, WALL_SECTIONS,
};

pub use parser::{
    parse_directory, Archive, Lump, Section, DEFAULT_SECTION, PALETTE_LUMP,
};

pub use repr::{Entry, Head, MAGIC};
