use crate::error::{BinParse, BinParseResult};

/// Random-access view over a whole file.  Every read names its own absolute
/// offset, so decoders never share a cursor.
#[derive(Clone, Copy, Debug)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteSource { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow `length` bytes starting at `offset`
    pub fn slice(
        &self,
        offset: usize,
        length: usize,
    ) -> BinParseResult<&'a [u8]> {
        offset
            .checked_add(length)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(BinParse::Truncated {
                offset,
                length,
                available: self.bytes.len(),
            })
    }

    /// View of the bytes in `offset..offset + length` as a source of its own
    pub fn sub_source(
        &self,
        offset: usize,
        length: usize,
    ) -> BinParseResult<ByteSource<'a>> {
        self.slice(offset, length).map(ByteSource::new)
    }

    pub fn array<const N: usize>(
        &self,
        offset: usize,
    ) -> BinParseResult<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.slice(offset, N)?);
        Ok(bytes)
    }

    pub fn u8_at(&self, offset: usize) -> BinParseResult<u8> {
        self.array::<1>(offset).map(|[b]| b)
    }

    pub fn i8_at(&self, offset: usize) -> BinParseResult<i8> {
        self.array(offset).map(i8::from_le_bytes)
    }

    pub fn u16_at(&self, offset: usize) -> BinParseResult<u16> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn i16_at(&self, offset: usize) -> BinParseResult<i16> {
        self.array(offset).map(i16::from_le_bytes)
    }
}
