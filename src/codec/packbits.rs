//! PackBits byte-run compression, as used by the LBM screens

use crate::error::{BinParse, BinParseResult};
use std::vec::Vec;

const MAX_RUN: usize = 128;

/// Expand `src` into exactly `out_len` bytes.  Decoding stops as soon as the
/// output is full or the input runs out; unwritten bytes stay zero.
///
/// A control byte `c < 0x80` copies the next `c + 1` bytes; `c > 0x80`
/// repeats the next byte `257 - c` times; `0x80` is a no-op.
pub fn unpack(src: &[u8], out_len: usize) -> BinParseResult<Vec<u8>> {
    let mut out = vec![0u8; out_len];
    let mut written = 0usize;
    let mut pos = 0usize;

    while pos < src.len() && written < out_len {
        let control = src[pos];
        pos += 1;

        match control {
            0x00..=0x7F => {
                let count = usize::from(control) + 1;
                let literal =
                    src.get(pos..pos + count).ok_or(BinParse::Truncated {
                        offset: pos,
                        length: count,
                        available: src.len(),
                    })?;
                let n = count.min(out_len - written);
                out[written..written + n].copy_from_slice(&literal[..n]);
                written += n;
                pos += count;
            }
            0x80 => {}
            _ => {
                let count = 257 - usize::from(control);
                let &value = src.get(pos).ok_or(BinParse::Truncated {
                    offset: pos,
                    length: 1,
                    available: src.len(),
                })?;
                let n = count.min(out_len - written);
                out[written..written + n].fill(value);
                written += n;
                pos += 1;
            }
        }
    }

    Ok(out)
}

/// Compress `src` into a stream `unpack` reverses
pub fn pack(src: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len() + src.len() / MAX_RUN + 1);
    let mut index = 0;

    while index < src.len() {
        let run = repeat_len(&src[index..]);

        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(src[index]);
            index += run;
            continue;
        }

        let start = index;

        while index < src.len()
            && index - start < MAX_RUN
            && repeat_len(&src[index..]) < 2
        {
            index += 1;
        }

        out.push((index - start - 1) as u8);
        out.extend_from_slice(&src[start..index]);
    }

    out
}

fn repeat_len(src: &[u8]) -> usize {
    let first = src[0];
    src.iter().take(MAX_RUN).take_while(|&&b| b == first).count()
}
