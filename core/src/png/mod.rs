//! png/mod.rs
//! Minimal PNG container for 8-bit RGBA images.
//!
//! Produces `signature || IHDR || IDAT || IEND`. The IDAT zlib stream uses
//! stored (uncompressed) deflate blocks only, so the file size tracks the
//! pixel count; any conformant reader still opens it.
//!
//! Decode accepts the same subset: RGBA8, no interlace, stored blocks, filter
//! type 0 on every scanline. Ancillary chunks are skipped and split IDAT
//! chunks are concatenated.

pub mod types;
pub mod checksum;
pub mod chunk;
pub mod zlib;
pub mod encode;
pub mod decode;

pub use types::*;
pub use checksum::*;
pub use encode::*;
pub use decode::*;
