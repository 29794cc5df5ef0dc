//! frame/mod.rs
//! Binary frame embedded in RGBA pixel channels.
//!
//! Layout of the pixel buffer (`width * height * 4` bytes):
//!
//! ```text
//! [ header (32) ][ payload (data_length) ][ random filler ... ]
//! ```
//!
//! - Header fields are big-endian u32s.
//! - Geometry is a pure function of `data_length`, see `geometry`.
//! - Filler is camouflage only and is ignored on decode.

pub mod types;
pub mod geometry;
pub mod encode;
pub mod decode;

pub use types::*;
pub use geometry::*;
pub use encode::*;
pub use decode::*;
