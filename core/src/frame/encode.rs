//! frame/encode.rs
//! Header serialization and payload -> pixel buffer packing.

use byteorder::{BigEndian, ByteOrder};
use rand::RngCore;
use tracing::debug;

use crate::frame::geometry::calculate_dimensions;
use crate::frame::types::{additive_checksum, FrameError, FrameHeader};
use crate::progress::{Phase, ProgressReporter};

/// Header plus the full RGBA buffer it was packed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedFrame {
    pub header: FrameHeader,
    pub pixels: Vec<u8>,
}

/// Serialize a header into its 32-byte big-endian form.
pub fn encode_header_be(h: &FrameHeader) -> [u8; FrameHeader::LEN] {
    let mut out = [0u8; FrameHeader::LEN];
    let mut i = 0usize;

    fn put_u32(out: &mut [u8], i: &mut usize, v: u32) {
        BigEndian::write_u32(&mut out[*i..*i + 4], v);
        *i += 4;
    }

    put_u32(&mut out, &mut i, h.magic);       // 0..4
    put_u32(&mut out, &mut i, h.version);     // 4..8
    put_u32(&mut out, &mut i, h.mode);        // 8..12
    put_u32(&mut out, &mut i, h.width);       // 12..16
    put_u32(&mut out, &mut i, h.height);      // 16..20
    put_u32(&mut out, &mut i, h.data_length); // 20..24
    put_u32(&mut out, &mut i, h.checksum);    // 24..28
    put_u32(&mut out, &mut i, h.reserved);    // 28..32

    debug_assert_eq!(i, FrameHeader::LEN, "encoding wrote incorrect length");
    out
}

/// Pack `payload` into a fresh pixel buffer using the thread RNG for filler.
pub fn pack(payload: &[u8], reporter: &mut ProgressReporter<'_>) -> Result<PackedFrame, FrameError> {
    pack_with_rng(payload, &mut rand::thread_rng(), reporter)
}

/// Pack `payload` with filler drawn from `rng`.
///
/// Filler is cosmetic, so any RNG will do.
pub fn pack_with_rng<R: RngCore>(
    payload: &[u8],
    rng: &mut R,
    reporter: &mut ProgressReporter<'_>,
) -> Result<PackedFrame, FrameError> {
    let data_length = u32::try_from(payload.len())
        .map_err(|_| FrameError::PayloadTooLarge { len: payload.len() })?;

    let (width, height) = calculate_dimensions(data_length);
    let header = FrameHeader::new(width, height, data_length, additive_checksum(payload));

    let buffer_len = usize::try_from(header.capacity())
        .map_err(|_| FrameError::PayloadTooLarge { len: payload.len() })?;
    let mut pixels = vec![0u8; buffer_len];
    rng.fill_bytes(&mut pixels);

    pixels[..FrameHeader::LEN].copy_from_slice(&encode_header_be(&header));

    let total = payload.len() as u64;
    let step = (payload.len() / 100).max(1);
    let body = &mut pixels[FrameHeader::LEN..FrameHeader::LEN + payload.len()];
    let mut copied = 0usize;
    for (dst, src) in body.chunks_mut(step).zip(payload.chunks(step)) {
        dst.copy_from_slice(src);
        copied += src.len();
        reporter.report(Phase::Pack, copied as u64, total);
    }
    reporter.complete(Phase::Pack, total);

    debug!(width, height, data_length, buffer_len, "frame packed");
    Ok(PackedFrame { header, pixels })
}
