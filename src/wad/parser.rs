use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::path::Path;
use std::string::{String, ToString};
use std::sync::Arc;
use std::vec::Vec;

use tracing::{debug, warn};

use crate::common::{palette_from_bytes, ByteSource, Palette};
use crate::error::{BinParse, BinParseResult};
use crate::lump::{self, Kind, Payload};
use crate::wad::{Entry, Head};

/// Section that holds lumps appearing before any marker, or after a `STOP`
/// marker
pub const DEFAULT_SECTION: &str = "General";

/// Name of the lump holding the archive palette
pub const PALETTE_LUMP: &str = "PAL";

/// Read the header and flat directory table
pub fn parse_directory(
    source: ByteSource,
) -> BinParseResult<(Head, Vec<Entry>)> {
    let header = Head::try_from(source.array::<{ Head::SIZE }>(0)?)?;
    let (dir_offset, entry_ct) = header.directory_span(source.len())?;

    debug!("WAD directory: {entry_ct} lumps at offset {dir_offset}");

    let entries = (0..entry_ct)
        .map(|i| {
            source
                .array::<{ Entry::SIZE }>(dir_offset + i * Entry::SIZE)
                .map(Entry::from)
        })
        .collect::<BinParseResult<Vec<_>>>()?;

    Ok((header, entries))
}

/// One named record of the archive and whatever it has been decoded as
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Lump {
    name: String,
    offset: usize,
    length: usize,
    payload: Option<Payload>,
}

impl Lump {
    fn from_entry(entry: &Entry) -> BinParseResult<Self> {
        let name = entry.name_to_string();
        let offset = usize::try_from(entry.file_pos()).map_err(|_| {
            BinParse::format(format!("Lump `{name}` has negative position"))
        })?;
        let length = usize::try_from(entry.size()).map_err(|_| {
            BinParse::format(format!("Lump `{name}` has negative size"))
        })?;

        Ok(Lump {
            name,
            offset,
            length,
            payload: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn kind(&self) -> Kind {
        self.payload.as_ref().map_or(Kind::Unresolved, Payload::kind)
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.payload.is_some()
    }

    fn bytes<'a>(&self, source: ByteSource<'a>) -> BinParseResult<&'a [u8]> {
        source.slice(self.offset, self.length)
    }

    /// Decode as `kind`, replacing any previous payload only on success
    fn decode(
        &mut self,
        source: ByteSource,
        kind: Kind,
        palette: Option<&Arc<Palette>>,
    ) -> BinParseResult<Kind> {
        let bytes = self.bytes(source)?;

        if let Some(payload) = lump::decode(&self.name, bytes, kind, palette)? {
            self.payload = Some(payload);
        }

        Ok(self.kind())
    }
}

/// Lumps between a pair of section markers, in directory order
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Section {
    name: String,
    lumps: Vec<Lump>,
    index: HashMap<String, usize>,
}

impl Section {
    fn new(name: String) -> Self {
        Section {
            name,
            lumps: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps[..]
    }

    pub fn get(&self, name: &str) -> Option<&Lump> {
        self.index.get(name).map(|&i| &self.lumps[i])
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Lump> {
        self.index.get(name).map(|&i| &mut self.lumps[i])
    }

    /// Append `lump` unless the name is already taken
    fn push(&mut self, lump: Lump) -> Result<(), Lump> {
        match self.index.entry(lump.name.clone()) {
            MapEntry::Vacant(slot) => {
                slot.insert(self.lumps.len());
                self.lumps.push(lump);
                Ok(())
            }
            MapEntry::Occupied(_) => Err(lump),
        }
    }
}

/// Parsed asset archive.  Lumps start out unresolved; the consumer decodes
/// each section as the kind it knows the section to hold.
#[derive(Clone, Debug)]
pub struct Archive {
    bytes: Vec<u8>,
    head: Head,
    palette: Option<Arc<Palette>>,
    sections: Vec<Section>,
    section_index: HashMap<String, usize>,
    warnings: Vec<String>,
}

impl Archive {
    pub fn open(path: impl AsRef<Path>) -> BinParseResult<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> BinParseResult<Self> {
        let bytes = bytes.into();
        let source = ByteSource::new(&bytes);
        let (head, entries) = parse_directory(source)?;

        let mut archive = Archive {
            bytes: Vec::new(),
            head,
            palette: None,
            sections: Vec::new(),
            section_index: HashMap::new(),
            warnings: Vec::new(),
        };

        let mut current = DEFAULT_SECTION.to_string();

        for entry in &entries {
            let name = entry.name_to_string();

            if entry.is_marker() {
                current = section_for_marker(&name).to_string();
                debug!("Section marker `{name}` opens `{current}`");
                continue;
            }

            let lump = Lump::from_entry(entry)?;

            if name == PALETTE_LUMP {
                if archive.palette.is_some() {
                    archive.warn(format!("Ignoring additional `{name}` lump"));
                } else {
                    let palette = palette_from_bytes(lump.bytes(source)?)?;
                    archive.palette = Some(Arc::new(palette));
                }
                continue;
            }

            if let Err(lump) = archive.section_entry(&current).push(lump) {
                archive.warn(format!(
                    "Skipping duplicate lump `{}` in section `{current}`",
                    lump.name()
                ));
            }
        }

        archive.bytes = bytes;

        Ok(archive)
    }

    pub fn head(&self) -> Head {
        self.head
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }

    /// Sections in order of first appearance
    pub fn sections(&self) -> &[Section] {
        &self.sections[..]
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.section_index.get(name).map(|&i| &self.sections[i])
    }

    pub fn lump(&self, section: &str, name: &str) -> Option<&Lump> {
        self.section(section)?.get(name)
    }

    /// Problems found while reading the directory that did not stop the load
    pub fn warnings(&self) -> &[String] {
        &self.warnings[..]
    }

    /// Undecoded bytes of a lump
    pub fn lump_bytes(&self, lump: &Lump) -> BinParseResult<&[u8]> {
        lump.bytes(ByteSource::new(&self.bytes))
    }

    /// Read a lump's bytes as a palette, for lumps decoded against something
    /// other than the archive palette
    pub fn lump_palette(
        &self,
        section: &str,
        name: &str,
    ) -> BinParseResult<Palette> {
        let lump = self
            .lump(section, name)
            .ok_or_else(|| missing(section, name))?;
        palette_from_bytes(self.lump_bytes(lump)?)
    }

    /// Try `attempts` in order on every unresolved lump of `section`; the
    /// first kind that resolves wins.  Returns how many lumps are resolved
    /// afterwards.
    pub fn decode_section(
        &mut self,
        section: &str,
        attempts: &[Kind],
    ) -> BinParseResult<usize> {
        let index = *self.section_index.get(section).ok_or_else(|| {
            BinParse::format(format!("No section `{section}`"))
        })?;

        let source = ByteSource::new(&self.bytes);
        let palette = self.palette.as_ref();
        let section = &mut self.sections[index];

        for lump in section.lumps.iter_mut().filter(|l| !l.is_resolved()) {
            for &kind in attempts {
                if lump.decode(source, kind, palette)? != Kind::Unresolved {
                    break;
                }
            }
        }

        Ok(section.lumps.iter().filter(|l| l.is_resolved()).count())
    }

    /// Decode one lump against the archive palette
    pub fn decode_lump(
        &mut self,
        section: &str,
        name: &str,
        kind: Kind,
    ) -> BinParseResult<Kind> {
        let palette = self.palette.clone();
        self.decode_lump_inner(section, name, kind, palette.as_ref())
    }

    /// Decode one lump against an explicit palette
    pub fn decode_lump_with_palette(
        &mut self,
        section: &str,
        name: &str,
        kind: Kind,
        palette: Arc<Palette>,
    ) -> BinParseResult<Kind> {
        self.decode_lump_inner(section, name, kind, Some(&palette))
    }

    fn decode_lump_inner(
        &mut self,
        section: &str,
        name: &str,
        kind: Kind,
        palette: Option<&Arc<Palette>>,
    ) -> BinParseResult<Kind> {
        let source = ByteSource::new(&self.bytes);
        let lump = self
            .section_index
            .get(section)
            .and_then(|&i| self.sections[i].get_mut(name))
            .ok_or_else(|| missing(section, name))?;

        lump.decode(source, kind, palette)
    }

    fn section_entry(&mut self, name: &str) -> &mut Section {
        let index = match self.section_index.entry(name.to_string()) {
            MapEntry::Occupied(slot) => *slot.get(),
            MapEntry::Vacant(slot) => {
                self.sections.push(Section::new(name.to_string()));
                *slot.insert(self.sections.len() - 1)
            }
        };

        &mut self.sections[index]
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

fn section_for_marker(name: &str) -> &str {
    if name.ends_with("STOP") {
        DEFAULT_SECTION
    } else if let Some(stem) = name.strip_suffix("STRT") {
        stem
    } else if let Some(stem) = name.strip_suffix("START") {
        stem
    } else {
        name
    }
}

fn missing(section: &str, name: &str) -> BinParse {
    BinParse::format(format!("No lump `{name}` in section `{section}`"))
}
