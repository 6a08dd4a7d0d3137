//! Which kind each part of the shipped game archive holds

use std::sync::Arc;

use tracing::debug;

use crate::error::BinParseResult;
use crate::lump::Kind;
use crate::wad::Archive;

/// Sections of 64x64 walls, with a few patches mixed in
pub const WALL_SECTIONS: [&str; 7] =
    ["WALL", "ELEV", "ANIM", "DOOR", "EXIT", "SIDE", "ABVW"];

pub const FLOOR_CEILING_SECTIONS: [&str; 1] = ["UPDN"];

pub const SPRITE_SECTIONS: [&str; 4] = ["SHAP", "MASK", "HMSK", "ABVM"];

pub const SKY_SECTIONS: [&str; 1] = ["SKY"];

/// Sections of assorted graphics, tried as patch, then picture, then raw
pub const MIXED_SECTIONS: [&str; 4] = ["GUN", "General", "ORDR", "PLAYMAPS"];

/// Sounds, music and other non-image data
pub const RAW_SECTIONS: [&str; 5] = ["DIGI", "SONG", "AD", "SPECMAPS", "PC"];

pub const MIXED_ATTEMPTS: [Kind; 3] = [Kind::Patch, Kind::Picture, Kind::Raw];

const EARLY_FONTS: [(&str, &str); 2] =
    [("General", "NEWFNT1"), ("General", "SMALLFON")];

const LATE_FONTS: [(&str, &str); 5] = [
    ("General", "TINYFONT"),
    ("General", "ITNYFONT"),
    ("General", "IFNT"),
    ("General", "SIFONT"),
    ("General", "LIFONT"),
];

const KEY_PICTURES: [(&str, &str); 4] = [
    ("General", "KEY1"),
    ("General", "KEY2"),
    ("General", "KEY3"),
    ("General", "KEY4"),
];

const ALTERNATE_PALETTES: [(&str, &str); 5] = [
    ("PLAYMAPS", "FINDRPAL"),
    ("PLAYMAPS", "FINFRPAL"),
    ("PLAYMAPS", "NICPAL"),
    ("PLAYMAPS", "BOATPAL"),
    ("General", "AP_PAL"),
];

/// (section, lump, kind, palette lump in the same section)
const PALETTED_LUMPS: [(&str, &str, Kind, &str); 7] = [
    ("PLAYMAPS", "FINLDOOR", Kind::Patch, "FINDRPAL"),
    ("PLAYMAPS", "FINLFIRE", Kind::Patch, "FINFRPAL"),
    ("PLAYMAPS", "BUDGCUT", Kind::Patch, "NICPAL"),
    ("PLAYMAPS", "NICOLAS", Kind::Patch, "NICPAL"),
    ("PLAYMAPS", "ONEYEAR", Kind::Patch, "NICPAL"),
    ("General", "AP_TITL", Kind::Patch, "AP_PAL"),
    ("General", "AP_WRLD", Kind::Picture, "AP_PAL"),
];

const LBM_SCREENS: [(&str, &str); 4] = [
    ("PLAYMAPS", "BOOTBLOD"),
    ("PLAYMAPS", "BOOTNORM"),
    ("PLAYMAPS", "DEADBOSS"),
    ("PLAYMAPS", "IMFREE"),
];

impl Archive {
    /// Decode every lump of the shipped game archive as the kind it is
    /// known to hold.  Sections and lumps the archive lacks are skipped.
    pub fn decode_standard(&mut self) -> BinParseResult<()> {
        for section in WALL_SECTIONS {
            self.decode_section_if_present(section, &[Kind::Wall])?;
        }

        for section in FLOOR_CEILING_SECTIONS {
            self.decode_section_if_present(section, &[Kind::FloorCeiling])?;
        }

        for section in SPRITE_SECTIONS {
            self.decode_section_if_present(section, &[Kind::Patch])?;
        }

        self.decode_lumps_if_present(&EARLY_FONTS, Kind::Font)?;
        self.decode_lumps_if_present(&KEY_PICTURES, Kind::Picture)?;

        // Palettes go first, the lumps below are drawn with them
        self.decode_lumps_if_present(&ALTERNATE_PALETTES, Kind::Raw)?;

        for (section, name, kind, palette_name) in PALETTED_LUMPS {
            if self.lump(section, name).is_none()
                || self.lump(section, palette_name).is_none()
            {
                debug!(
                    "Skipping `{name}`: lump or palette `{palette_name}` absent"
                );
                continue;
            }

            let palette = Arc::new(self.lump_palette(section, palette_name)?);
            self.decode_lump_with_palette(section, name, kind, palette)?;
        }

        self.decode_lumps_if_present(&LATE_FONTS, Kind::Font)?;
        self.decode_lumps_if_present(&LBM_SCREENS, Kind::Lbm)?;

        for section in SKY_SECTIONS {
            self.decode_section_if_present(section, &[Kind::Sky])?;
        }

        for section in MIXED_SECTIONS {
            self.decode_section_if_present(section, &MIXED_ATTEMPTS)?;
        }

        for section in RAW_SECTIONS {
            self.decode_section_if_present(section, &[Kind::Raw])?;
        }

        Ok(())
    }

    fn decode_section_if_present(
        &mut self,
        section: &str,
        attempts: &[Kind],
    ) -> BinParseResult<()> {
        if self.section(section).is_none() {
            debug!("Skipping absent section `{section}`");
            return Ok(());
        }

        let resolved = self.decode_section(section, attempts)?;
        debug!("Section `{section}`: {resolved} lumps resolved");

        Ok(())
    }

    fn decode_lumps_if_present(
        &mut self,
        lumps: &[(&str, &str)],
        kind: Kind,
    ) -> BinParseResult<()> {
        for &(section, name) in lumps {
            if self.lump(section, name).is_none() {
                debug!("Skipping absent lump `{name}` in `{section}`");
                continue;
            }

            self.decode_lump(section, name, kind)?;
        }

        Ok(())
    }
}
