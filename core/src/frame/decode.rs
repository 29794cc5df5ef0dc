//! frame/decode.rs
//! Header parsing and pixel buffer -> payload unpacking.
//!
//! Checks run cheapest first: header identity, geometry, bounds, checksum.

use byteorder::{BigEndian, ByteOrder};
use tracing::{debug, warn};

use crate::frame::geometry::calculate_dimensions;
use crate::frame::types::{additive_checksum, FrameError, FrameHeader};
use crate::progress::{Phase, ProgressReporter};

/// Parse the leading 32 bytes of `buf` without validating them.
pub fn decode_header_be(buf: &[u8]) -> Result<FrameHeader, FrameError> {
    if buf.len() < FrameHeader::LEN {
        return Err(FrameError::Truncated { have: buf.len(), need: FrameHeader::LEN });
    }

    let mut i = 0usize;
    #[inline]
    fn get_u32(buf: &[u8], i: &mut usize) -> u32 {
        let v = BigEndian::read_u32(&buf[*i..*i + 4]);
        *i += 4;
        v
    }

    let h = FrameHeader {
        magic:       get_u32(buf, &mut i), // 0..4
        version:     get_u32(buf, &mut i), // 4..8
        mode:        get_u32(buf, &mut i), // 8..12
        width:       get_u32(buf, &mut i), // 12..16
        height:      get_u32(buf, &mut i), // 16..20
        data_length: get_u32(buf, &mut i), // 20..24
        checksum:    get_u32(buf, &mut i), // 24..28
        reserved:    get_u32(buf, &mut i), // 28..32
    };
    debug_assert_eq!(i, FrameHeader::LEN);
    Ok(h)
}

/// Recover the payload embedded in `pixels`.
pub fn unpack(pixels: &[u8], reporter: &mut ProgressReporter<'_>) -> Result<Vec<u8>, FrameError> {
    let header = decode_header_be(pixels)?;
    if let Err(e) = header.validate() {
        warn!(error = %e, "frame header rejected");
        return Err(e);
    }

    if header.capacity() != pixels.len() as u64 {
        return Err(FrameError::GeometryMismatch {
            width: header.width,
            height: header.height,
            detail: format!("pixel buffer of {} bytes", pixels.len()),
        });
    }

    let capacity = header.capacity();
    let end = FrameHeader::LEN as u64 + u64::from(header.data_length);
    if end > capacity {
        return Err(FrameError::DataLengthOutOfBounds {
            data_length: header.data_length,
            capacity,
        });
    }

    if calculate_dimensions(header.data_length) != (header.width, header.height) {
        return Err(FrameError::GeometryMismatch {
            width: header.width,
            height: header.height,
            detail: format!("data length {}", header.data_length),
        });
    }

    let body = &pixels[FrameHeader::LEN..end as usize];
    let total = body.len() as u64;
    let step = (body.len() / 100).max(1);
    let mut payload = Vec::with_capacity(body.len());
    for src in body.chunks(step) {
        payload.extend_from_slice(src);
        reporter.report(Phase::Unpack, payload.len() as u64, total);
    }

    let actual = additive_checksum(&payload);
    if actual != header.checksum {
        warn!(expected = header.checksum, actual, "frame checksum mismatch");
        return Err(FrameError::ChecksumMismatch { expected: header.checksum, actual });
    }
    reporter.complete(Phase::Unpack, total);

    debug!(width = header.width, height = header.height, data_length = header.data_length, "frame unpacked");
    Ok(payload)
}
