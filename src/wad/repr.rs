use std::mem::size_of;
use std::string::String;

use crate::common::name_from_bytes;
use crate::error::{BinParse, BinParseResult};

pub const MAGIC: [[u8; 4]; 2] = [*b"IWAD", *b"PWAD"];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, packed)]
pub struct Head {
    magic: [u8; 4],
    lump_count: i32,
    directory_offset: i32,
}

impl Head {
    pub const SIZE: usize = size_of::<Head>();

    pub fn new(lump_count: i32, directory_offset: i32) -> Self {
        Head {
            magic: MAGIC[0],
            lump_count,
            directory_offset,
        }
    }

    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    pub fn lump_count(&self) -> i32 {
        self.lump_count
    }

    pub fn directory_offset(&self) -> i32 {
        self.directory_offset
    }

    /// Check that the directory lies inside a file of `file_size` bytes and
    /// return its (offset, entry count)
    pub fn directory_span(
        &self,
        file_size: usize,
    ) -> BinParseResult<(usize, usize)> {
        let count = usize::try_from(self.lump_count).map_err(|_| {
            BinParse::format(format!(
                "Negative lump count {}",
                self.lump_count()
            ))
        })?;

        let offset = usize::try_from(self.directory_offset).map_err(|_| {
            BinParse::format(format!(
                "Negative directory offset {}",
                self.directory_offset()
            ))
        })?;

        let end = count
            .checked_mul(Entry::SIZE)
            .and_then(|len| len.checked_add(offset));

        match end {
            Some(end) if end <= file_size => Ok((offset, count)),
            _ => Err(BinParse::format(format!(
                "Directory of {count} lumps at {offset} exceeds file size \
                 {file_size}"
            ))),
        }
    }
}

impl TryFrom<[u8; size_of::<Head>()]> for Head {
    type Error = BinParse;

    fn try_from(bytes: [u8; size_of::<Head>()]) -> Result<Self, Self::Error> {
        let (magic, rest) = bytes.split_at(4);

        if !MAGIC.iter().any(|m| m[..] == *magic) {
            return Err(BinParse::format(format!(
                "Magic number {magic:?} is neither `IWAD` nor `PWAD`"
            )));
        }

        let (count, offset) = rest.split_at(4);

        Ok(Head {
            magic: [magic[0], magic[1], magic[2], magic[3]],
            lump_count: i32::from_le_bytes([
                count[0], count[1], count[2], count[3],
            ]),
            directory_offset: i32::from_le_bytes([
                offset[0], offset[1], offset[2], offset[3],
            ]),
        })
    }
}

/// Directory record: lump location, size and 8-byte name
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, packed)]
pub struct Entry {
    file_pos: i32,
    size: i32,
    name: [u8; 8],
}

impl Entry {
    pub const SIZE: usize = size_of::<Entry>();

    pub fn new(file_pos: i32, size: i32, name: [u8; 8]) -> Self {
        Entry {
            file_pos,
            size,
            name,
        }
    }

    /// Name in raw bytes
    pub fn name(&self) -> [u8; 8] {
        self.name
    }

    /// Name up to the first nul byte
    pub fn name_to_string(&self) -> String {
        name_from_bytes(&self.name)
    }

    pub fn file_pos(&self) -> i32 {
        self.file_pos
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Zero-length entries delimit sections rather than hold data
    pub fn is_marker(&self) -> bool {
        self.size == 0
    }
}

impl From<[u8; size_of::<Entry>()]> for Entry {
    fn from(bytes: [u8; size_of::<Entry>()]) -> Self {
        let mut name = [0u8; 8];
        name.copy_from_slice(&bytes[8..]);

        Entry {
            file_pos: i32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]),
            size: i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            name,
        }
    }
}
