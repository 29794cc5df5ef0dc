//! png/zlib.rs
//! zlib wrapper around stored (uncompressed) deflate blocks.
//!
//! ```text
//! [ CMF FLG ][ block ]* [ adler32 (4, BE) ]
//! block = [ BFINAL | BTYPE=00 << 1 ][ LEN (2, LE) ][ NLEN (2, LE) ][ LEN bytes ]
//! ```
//!
//! Every stored block header starts on a byte boundary, so its three header
//! bits and five padding bits occupy exactly one byte.

use crate::constants::png::{MAX_STORED_BLOCK, ZLIB_HEADER};
use crate::png::checksum::adler32;
use crate::png::types::PngError;

/// BFINAL bit + BTYPE (2 bits) + padding.
const STORED_HEADER_LEN: usize = 5;
const ADLER_LEN: usize = 4;
const CM_DEFLATE: u8 = 8;
const FLG_FDICT: u8 = 0x20;

/// Wrap `raw` as a zlib stream of stored blocks.
///
/// `on_block(done)` fires after each block with the raw bytes consumed.
pub fn deflate_stored<F>(raw: &[u8], mut on_block: F) -> Vec<u8>
where
    F: FnMut(usize),
{
    let blocks = raw.len().div_ceil(MAX_STORED_BLOCK).max(1);
    let mut out = Vec::with_capacity(
        ZLIB_HEADER.len() + blocks * STORED_HEADER_LEN + raw.len() + ADLER_LEN,
    );
    out.extend_from_slice(&ZLIB_HEADER);

    if raw.is_empty() {
        push_stored_header(&mut out, true, 0);
    }

    let mut done = 0usize;
    let mut chunks = raw.chunks(MAX_STORED_BLOCK).peekable();
    while let Some(block) = chunks.next() {
        let last = chunks.peek().is_none();
        push_stored_header(&mut out, last, block.len() as u16);
        out.extend_from_slice(block);
        done += block.len();
        on_block(done);
    }

    out.extend_from_slice(&adler32(raw).to_be_bytes());
    out
}

fn push_stored_header(out: &mut Vec<u8>, last: bool, len: u16) {
    out.push(u8::from(last)); // BTYPE 00
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&(!len).to_le_bytes());
}

/// Unwrap a zlib stream made only of stored blocks and verify its Adler32.
///
/// `size_hint` pre-sizes the output; `on_block(done)` fires after each block.
pub fn inflate_stored<F>(stream: &[u8], size_hint: usize, mut on_block: F) -> Result<Vec<u8>, PngError>
where
    F: FnMut(usize),
{
    if stream.len() < ZLIB_HEADER.len() {
        return Err(PngError::Malformed("zlib stream too short".into()));
    }
    let (cmf, flg) = (stream[0], stream[1]);
    if cmf & 0x0F != CM_DEFLATE || cmf >> 4 > 7 {
        return Err(PngError::UnsupportedCompression(format!("zlib CMF {:#04x}", cmf)));
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(PngError::Malformed("zlib header check bits".into()));
    }
    if flg & FLG_FDICT != 0 {
        return Err(PngError::UnsupportedCompression("zlib preset dictionary".into()));
    }

    let mut out = Vec::with_capacity(size_hint);
    let mut pos = ZLIB_HEADER.len();
    loop {
        let header = *stream
            .get(pos)
            .ok_or_else(|| PngError::Malformed("zlib stream ends before final block".into()))?;
        let last = header & 0x01 != 0;
        let btype = (header >> 1) & 0x03;
        if btype != 0 {
            return Err(PngError::UnsupportedCompression(format!(
                "deflate block type {} at offset {}",
                btype, pos
            )));
        }

        let lens = stream
            .get(pos + 1..pos + STORED_HEADER_LEN)
            .ok_or_else(|| PngError::Malformed("truncated stored block header".into()))?;
        let len = u16::from_le_bytes([lens[0], lens[1]]);
        let nlen = u16::from_le_bytes([lens[2], lens[3]]);
        if len != !nlen {
            return Err(PngError::Malformed(format!(
                "stored block LEN {:#06x} / NLEN {:#06x} mismatch",
                len, nlen
            )));
        }
        pos += STORED_HEADER_LEN;

        let data = stream
            .get(pos..pos + len as usize)
            .ok_or_else(|| PngError::Malformed("truncated stored block".into()))?;
        out.extend_from_slice(data);
        pos += len as usize;
        on_block(out.len());

        if last {
            break;
        }
    }

    let trailer = stream
        .get(pos..pos + ADLER_LEN)
        .ok_or_else(|| PngError::Malformed("missing Adler32 trailer".into()))?;
    let stored = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let computed = adler32(&out);
    if stored != computed {
        return Err(PngError::Malformed(format!(
            "Adler32 mismatch: stored {:#010x}, computed {:#010x}",
            stored, computed
        )));
    }
    Ok(out)
}
