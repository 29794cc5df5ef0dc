//! png/types.rs
//! Image header, decoded image, and container errors.

use thiserror::Error;

use crate::constants::png::{BIT_DEPTH_8, COLOR_TYPE_RGBA, IHDR_LEN};
use crate::constants::BYTES_PER_PIXEL;

/// PNG caps each dimension at 2^31 - 1.
pub const MAX_DIMENSION: u32 = i32::MAX as u32;

/// Decoded IHDR body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression: u8,
    pub filter: u8,
    pub interlace: u8,
}

impl ImageHeader {
    pub fn rgba8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bit_depth: BIT_DEPTH_8,
            color_type: COLOR_TYPE_RGBA,
            compression: 0,
            filter: 0,
            interlace: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; IHDR_LEN] {
        let mut out = [0u8; IHDR_LEN];
        out[0..4].copy_from_slice(&self.width.to_be_bytes());
        out[4..8].copy_from_slice(&self.height.to_be_bytes());
        out[8] = self.bit_depth;
        out[9] = self.color_type;
        out[10] = self.compression;
        out[11] = self.filter;
        out[12] = self.interlace;
        out
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, PngError> {
        if data.len() != IHDR_LEN {
            return Err(PngError::Malformed(format!(
                "IHDR length {} (expected {})",
                data.len(),
                IHDR_LEN
            )));
        }
        let mut w = [0u8; 4];
        let mut h = [0u8; 4];
        w.copy_from_slice(&data[0..4]);
        h.copy_from_slice(&data[4..8]);
        Ok(Self {
            width: u32::from_be_bytes(w),
            height: u32::from_be_bytes(h),
            bit_depth: data[8],
            color_type: data[9],
            compression: data[10],
            filter: data[11],
            interlace: data[12],
        })
    }

    /// Reject anything outside the RGBA8 / stored / unfiltered subset.
    pub fn validate(&self) -> Result<(), PngError> {
        validate_dimensions(self.width, self.height)
            .map_err(|_| PngError::Malformed(format!("IHDR dimensions {}x{}", self.width, self.height)))?;
        if self.bit_depth != BIT_DEPTH_8 || self.color_type != COLOR_TYPE_RGBA {
            return Err(PngError::Malformed(format!(
                "unsupported pixel format: bit depth {}, color type {}",
                self.bit_depth, self.color_type
            )));
        }
        if self.compression != 0 {
            return Err(PngError::UnsupportedCompression(format!(
                "IHDR compression method {}",
                self.compression
            )));
        }
        if self.filter != 0 {
            return Err(PngError::Malformed(format!("IHDR filter method {}", self.filter)));
        }
        if self.interlace != 0 {
            return Err(PngError::Malformed(format!("interlace method {}", self.interlace)));
        }
        Ok(())
    }

    /// Bytes per unfiltered scanline.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

pub(crate) fn validate_dimensions(width: u32, height: u32) -> Result<(), PngError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(PngError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Raw RGBA pixels with their dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PngError {
    #[error("not a PNG file: bad signature")]
    InvalidSignature,

    #[error("malformed PNG: {0}")]
    Malformed(String),

    #[error("unsupported PNG compression: {0}")]
    UnsupportedCompression(String),

    #[error("unsupported PNG filter type {filter} on scanline {row}")]
    UnsupportedFilter { row: u32, filter: u8 },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel buffer is {have} bytes, {width}x{height} RGBA needs {need}")]
    PixelLengthMismatch { width: u32, height: u32, have: usize, need: u64 },
}
