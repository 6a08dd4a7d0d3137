//! Run-length encoding of 16-bit words keyed by an escape ("tag") word

use crate::error::{BinParse, BinParseResult};
use std::vec::Vec;

const WORD: usize = 2;

/// Decode a little-endian RLEW stream.  A word equal to `tag` is followed by
/// a run count and a value; any other word is a literal.
pub fn decode(bytes: &[u8], tag: u16) -> BinParseResult<Vec<u16>> {
    if bytes.len() % WORD != 0 {
        return Err(BinParse::format(format!(
            "RLEW stream has odd length {}",
            bytes.len()
        )));
    }

    let mut words = bytes
        .chunks_exact(WORD)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    let mut out = Vec::with_capacity(bytes.len() / WORD);
    let mut position = 0usize;

    while let Some(word) = words.next() {
        if word == tag {
            let (Some(count), Some(value)) = (words.next(), words.next())
            else {
                return Err(BinParse::format(format!(
                    "RLEW stream ends mid-run at byte {}",
                    position * WORD
                )));
            };

            out.extend(std::iter::repeat(value).take(count.into()));
            position += 3;
        } else {
            out.push(word);
            position += 1;
        }
    }

    Ok(out)
}

/// Encode `words` so that `decode(&encode(words, tag), tag) == words`.
/// Literal occurrences of `tag` are written as runs of one.
pub fn encode(words: &[u16], tag: u16) -> Vec<u8> {
    const MIN_RUN: usize = 4;

    let mut out = Vec::with_capacity(words.len() * WORD);
    let mut index = 0;

    while index < words.len() {
        let value = words[index];
        let run = words[index..]
            .iter()
            .take(usize::from(u16::MAX))
            .take_while(|&&w| w == value)
            .count();

        if run >= MIN_RUN || value == tag {
            out.extend(tag.to_le_bytes());
            out.extend((run as u16).to_le_bytes());
            out.extend(value.to_le_bytes());
        } else {
            for _ in 0..run {
                out.extend(value.to_le_bytes());
            }
        }

        index += run;
    }

    out
}
