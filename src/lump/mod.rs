mod parse;
mod repr;

pub use parse::{
    decode, decode_floor_ceiling, decode_font, decode_lbm, decode_patch,
    decode_picture, decode_sky, decode_wall, is_wall, read_raw,
    COLOURED_FONTS, SKY_HEIGHT, SKY_WIDTH, WALL_DIMENSION,
    WALL_FALSE_POSITIVES, WALL_SIZE,
};

pub use repr::{FloorCeiling, Font, Image, Kind, Patch, Payload};
