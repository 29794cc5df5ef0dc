//! constants.rs
//! Wire constants and defaults shared by every layer of the backup codec.

use std::time::Duration;

/// Frame magic marker, "VLTB" read as a big-endian u32.
pub const FRAME_MAGIC: u32 = u32::from_be_bytes(*b"VLTB");
/// Bumped on any header-incompatible change.
pub const FRAME_VERSION: u32 = 2;
/// Fixed frame header size in bytes.
pub const FRAME_HEADER_LEN: usize = 32;
/// RGBA: four payload bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Envelope field sizes.
pub mod envelope {
    pub const SALT_LEN: usize = 32;
    pub const IV_LEN: usize = 16;
    pub const MAC_LEN: usize = 32;
    pub const KEY_LEN: usize = 32;
    /// salt + iv + mac, the size of an envelope around an empty plaintext.
    pub const MIN_LEN: usize = SALT_LEN + IV_LEN + MAC_LEN;
}

/// Key derivation defaults.
pub const DEFAULT_KDF_ROUNDS: u32 = 100_000;
pub const DEFAULT_KDF_PROGRESS_EVERY: u32 = 5_000;

/// Counter-mode processing chunk (8 KiB).
pub const DEFAULT_CIPHER_CHUNK_SIZE: usize = 8 * 1024;
/// AES block size; cipher chunks must be a multiple of it.
pub const CIPHER_BLOCK_LEN: usize = 16;

/// Minimum gap between two progress events of the same phase.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(16);

/// Chunk size used when streaming the finished file to or from a sink.
pub const IO_CHUNK_SIZE: usize = 64 * 1024;

/// PNG container constants.
pub mod png {
    pub const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    pub const IHDR: [u8; 4] = *b"IHDR";
    pub const IDAT: [u8; 4] = *b"IDAT";
    pub const IEND: [u8; 4] = *b"IEND";
    pub const IHDR_LEN: usize = 13;

    pub const BIT_DEPTH_8: u8 = 8;
    pub const COLOR_TYPE_RGBA: u8 = 6;
    pub const FILTER_NONE: u8 = 0;

    /// CMF = deflate, 32K window; FLG = fastest, no dictionary, FCHECK valid.
    pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x01];
    /// Largest payload of one stored deflate block.
    pub const MAX_STORED_BLOCK: usize = 65_535;
}
