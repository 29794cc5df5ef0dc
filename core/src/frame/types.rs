//! frame/types.rs
//! Frame header struct, registries, and frame-layer errors.

use std::fmt;
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::{FRAME_HEADER_LEN, FRAME_MAGIC, FRAME_VERSION};

/// How payload bytes map onto pixel channels.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum FrameMode {
    /// One payload byte per channel, sequential, R G B A order.
    Sequential = 1,
}

impl FrameMode {
    pub fn verify(raw: u32) -> Result<Self, FrameError> {
        FrameMode::try_from_primitive(raw).map_err(|_| FrameError::UnsupportedMode { raw })
    }
}

/// 32-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u32,
    pub version: u32,
    pub mode: u32,
    pub width: u32,
    pub height: u32,
    pub data_length: u32,
    /// Sum of all payload bytes mod 2^32.
    pub checksum: u32,
    pub reserved: u32,
}

impl FrameHeader {
    pub const LEN: usize = FRAME_HEADER_LEN;

    /// Header for a payload of `data_length` bytes with the given geometry.
    pub fn new(width: u32, height: u32, data_length: u32, checksum: u32) -> Self {
        Self {
            magic: FRAME_MAGIC,
            version: FRAME_VERSION,
            mode: FrameMode::Sequential as u32,
            width,
            height,
            data_length,
            checksum,
            reserved: 0,
        }
    }

    /// Reject headers this build cannot interpret.
    pub fn validate(&self) -> Result<FrameMode, FrameError> {
        if self.magic != FRAME_MAGIC {
            return Err(FrameError::InvalidMagic { have: self.magic, need: FRAME_MAGIC });
        }
        if self.version != FRAME_VERSION {
            return Err(FrameError::UnsupportedVersion { have: self.version, need: FRAME_VERSION });
        }
        FrameMode::verify(self.mode)
    }

    /// Bytes available in the pixel buffer this header describes.
    pub fn capacity(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * crate::constants::BYTES_PER_PIXEL as u64
    }
}

/// Additive checksum: sum of bytes mod 2^32.
pub fn additive_checksum(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}

pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

fn mode_name(raw: &u32) -> String {
    enum_name_or_hex::<FrameMode>(*raw)
}

/// Render a magic value as ASCII when printable, hex otherwise.
pub fn fmt_magic(magic: &u32) -> String {
    let b = magic.to_be_bytes();
    if b.iter().all(|c| c.is_ascii_graphic()) {
        format!("b\"{}\"", String::from_utf8_lossy(&b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Pixel buffer too short to hold a header.
    #[error("pixel buffer too short: {have} < {need}")]
    Truncated { have: usize, need: usize },

    #[error("invalid frame magic: expected {}, got {}", fmt_magic(.need), fmt_magic(.have))]
    InvalidMagic { have: u32, need: u32 },

    #[error("unsupported frame version: {have} (expected {need})")]
    UnsupportedVersion { have: u32, need: u32 },

    #[error("unsupported frame mode: {}", mode_name(.raw))]
    UnsupportedMode { raw: u32 },

    /// Declared width/height disagree with the buffer or with the data length.
    #[error("frame geometry {width}x{height} does not match {detail}")]
    GeometryMismatch { width: u32, height: u32, detail: String },

    #[error("declared data length {data_length} exceeds frame capacity {capacity}")]
    DataLengthOutOfBounds { data_length: u32, capacity: u64 },

    #[error("payload checksum mismatch: header={expected:#010x}, computed={actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("payload too large for a frame: {len} bytes")]
    PayloadTooLarge { len: usize },
}
