//! png/decode.rs
//! PNG bytes -> RGBA pixel buffer.
//!
//! Order of checks: signature, chunk framing and CRCs, IHDR, zlib blocks,
//! Adler32, scanline filters. The signature is checked before any chunk is
//! touched.

use tracing::{debug, warn};

use crate::constants::png::{FILTER_NONE, IDAT, IEND, IHDR, SIGNATURE};
use crate::png::chunk::ChunkReader;
use crate::png::types::{ImageHeader, PngError, PngImage};
use crate::png::zlib::inflate_stored;
use crate::progress::{Phase, ProgressReporter};

pub fn decode_png(bytes: &[u8]) -> Result<PngImage, PngError> {
    decode_png_with_progress(bytes, &mut ProgressReporter::silent())
}

/// Like `decode_png`, reporting `decodePNG` progress over the filtered stream.
pub fn decode_png_with_progress(
    bytes: &[u8],
    reporter: &mut ProgressReporter<'_>,
) -> Result<PngImage, PngError> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        warn!(len = bytes.len(), "png signature rejected");
        return Err(PngError::InvalidSignature);
    }

    let mut ihdr: Option<ImageHeader> = None;
    let mut idat: Vec<u8> = Vec::new();
    let mut saw_idat = false;
    let mut saw_iend = false;

    for chunk in ChunkReader::new(&bytes[SIGNATURE.len()..]) {
        let chunk = chunk?;
        match chunk.kind {
            IHDR => {
                if ihdr.is_some() {
                    return Err(PngError::Malformed("duplicate IHDR".into()));
                }
                let header = ImageHeader::from_bytes(chunk.data)?;
                header.validate()?;
                ihdr = Some(header);
            }
            IDAT => {
                if ihdr.is_none() {
                    return Err(PngError::Malformed("IDAT before IHDR".into()));
                }
                idat.extend_from_slice(chunk.data);
                saw_idat = true;
            }
            IEND => {
                saw_iend = true;
                break;
            }
            _ => {
                debug!(chunk = %chunk.kind_str(), len = chunk.data.len(), "skipping chunk");
            }
        }
    }

    let ihdr = ihdr.ok_or_else(|| PngError::Malformed("missing IHDR".into()))?;
    if !saw_idat {
        return Err(PngError::Malformed("missing IDAT".into()));
    }
    if !saw_iend {
        return Err(PngError::Malformed("missing IEND".into()));
    }

    let stride = ihdr.stride();
    let expected = (stride as u64 + 1) * u64::from(ihdr.height);
    let total = expected;
    let filtered = inflate_stored(&idat, expected.min(idat.len() as u64) as usize, |done| {
        reporter.report(Phase::DecodePng, done as u64, total)
    })?;
    if filtered.len() as u64 != expected {
        return Err(PngError::Malformed(format!(
            "image data is {} bytes, {}x{} needs {}",
            filtered.len(),
            ihdr.width,
            ihdr.height,
            expected
        )));
    }

    let mut pixels = Vec::with_capacity(stride * ihdr.height as usize);
    for (row, line) in filtered.chunks_exact(stride + 1).enumerate() {
        if line[0] != FILTER_NONE {
            return Err(PngError::UnsupportedFilter { row: row as u32, filter: line[0] });
        }
        pixels.extend_from_slice(&line[1..]);
    }
    reporter.complete(Phase::DecodePng, total);

    debug!(width = ihdr.width, height = ihdr.height, "png decoded");
    Ok(PngImage { width: ihdr.width, height: ihdr.height, pixels })
}
