//! png/encode.rs
//! RGBA pixel buffer -> PNG bytes.

use tracing::debug;

use crate::constants::png::{FILTER_NONE, IDAT, IEND, IHDR, IHDR_LEN, SIGNATURE};
use crate::png::chunk::{write_chunk, CHUNK_OVERHEAD, MAX_CHUNK_DATA};
use crate::png::types::{validate_dimensions, ImageHeader, PngError};
use crate::png::zlib::deflate_stored;
use crate::progress::{Phase, ProgressReporter};

/// Encode `pixels` (`width * height * 4` bytes) as an uncompressed PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, PngError> {
    encode_png_with_progress(pixels, width, height, &mut ProgressReporter::silent())
}

/// Like `encode_png`, reporting `encodePNG` progress over the filtered stream.
pub fn encode_png_with_progress(
    pixels: &[u8],
    width: u32,
    height: u32,
    reporter: &mut ProgressReporter<'_>,
) -> Result<Vec<u8>, PngError> {
    validate_dimensions(width, height)?;
    let ihdr = ImageHeader::rgba8(width, height);
    let stride = ihdr.stride();

    let need = u64::from(width) * u64::from(height) * 4;
    if pixels.len() as u64 != need {
        return Err(PngError::PixelLengthMismatch { width, height, have: pixels.len(), need });
    }

    // Filter type 0 (None) in front of every scanline.
    let mut filtered = Vec::with_capacity(pixels.len() + height as usize);
    for row in pixels.chunks_exact(stride) {
        filtered.push(FILTER_NONE);
        filtered.extend_from_slice(row);
    }

    let total = filtered.len() as u64;
    let idat = deflate_stored(&filtered, |done| {
        reporter.report(Phase::EncodePng, done as u64, total)
    });
    if idat.len() > MAX_CHUNK_DATA {
        return Err(PngError::InvalidDimensions { width, height });
    }

    let mut out = Vec::with_capacity(SIGNATURE.len() + 3 * CHUNK_OVERHEAD + IHDR_LEN + idat.len());
    out.extend_from_slice(&SIGNATURE);
    write_chunk(&mut out, &IHDR, &ihdr.to_bytes());
    write_chunk(&mut out, &IDAT, &idat);
    write_chunk(&mut out, &IEND, &[]);

    reporter.complete(Phase::EncodePng, total);
    debug!(width, height, png_len = out.len(), "png encoded");
    Ok(out)
}
