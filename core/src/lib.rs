//! pixelvault-core
//!
//! Encrypted vault backups carried inside PNG images.
//! No Python, no PyO3, no FFI.
//!
//! ```text
//! vault -> JSON -> envelope (KDF + AES-CTR + HMAC) -> frame in RGBA pixels -> PNG
//! ```

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;

// Layers
pub mod crypto;
pub mod frame;
pub mod png;
pub mod progress;

// Wiring
pub mod io;
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::CodecConfig;
    pub use crate::crypto::VaultCodec;
    pub use crate::frame::{calculate_dimensions, pack, unpack, FrameHeader, PackedFrame};
    pub use crate::io::{InputSource, OutputSink};
    pub use crate::pipeline::{
        export_backup, export_backup_to, import_backup, import_backup_from, read_backup_file,
        write_backup_file,
    };
    pub use crate::png::{decode_png, encode_png, PngImage};
    pub use crate::progress::{Phase, ProgressEvent, ProgressReporter};
    pub use crate::types::{BackupError, ErrorKind};
}
