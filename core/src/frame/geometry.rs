//! frame/geometry.rs
//! Image dimensions as a pure function of payload length.

use crate::constants::{BYTES_PER_PIXEL, FRAME_HEADER_LEN};

/// Smallest near-square `(width, height)` holding header + `data_length` bytes.
///
/// `pixels = ceil((32 + n) / 4)`, `width = ceil(sqrt(pixels))`,
/// `height = ceil(pixels / width)`. Integer-only, so identical on every host.
pub fn calculate_dimensions(data_length: u32) -> (u32, u32) {
    let bytes = FRAME_HEADER_LEN as u64 + u64::from(data_length);
    let pixels = bytes.div_ceil(BYTES_PER_PIXEL as u64);
    let width = ceil_sqrt(pixels);
    let height = pixels.div_ceil(width);
    // pixels <= 2^30 + 8, so both sides stay well inside u32
    (width as u32, height as u32)
}

fn ceil_sqrt(n: u64) -> u64 {
    let mut r = (n as f64).sqrt() as u64;
    while r * r > n {
        r -= 1;
    }
    while r * r < n {
        r += 1;
    }
    r.max(1)
}
