//! types.rs
//! Crate-level error type and the kind taxonomy bindings report.
//!
//! Stage errors (`CryptoError`, `FrameError`, `PngError`) convert into
//! `BackupError` with `?`; `BackupError::kind` maps each to one `ErrorKind`.

use std::fmt;
use std::io;
use thiserror::Error;

use crate::crypto::CryptoError;
use crate::frame::FrameError;
use crate::png::PngError;

/// Coarse failure taxonomy exposed to callers and bindings.
///
/// Every kind is terminal for the call; retrying with the same inputs cannot
/// succeed differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Too short to be an envelope or frame.
    InvalidFormat,
    /// Unknown frame magic, version, or mode.
    UnsupportedFormat,
    /// Frame header fields contradict each other or the buffer.
    CorruptHeader,
    /// Payload corrupted at the pixel layer.
    ChecksumMismatch,
    /// Wrong password or tampered ciphertext.
    AuthenticationFailed,
    UnsupportedCompression,
    UnsupportedFilter,
    MalformedPng,
    Io,
    Serialization,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat          => "InvalidFormat",
            ErrorKind::UnsupportedFormat      => "UnsupportedFormat",
            ErrorKind::CorruptHeader          => "CorruptHeader",
            ErrorKind::ChecksumMismatch       => "ChecksumMismatch",
            ErrorKind::AuthenticationFailed   => "AuthenticationFailed",
            ErrorKind::UnsupportedCompression => "UnsupportedCompression",
            ErrorKind::UnsupportedFilter      => "UnsupportedFilter",
            ErrorKind::MalformedPng           => "MalformedPNG",
            ErrorKind::Io                     => "Io",
            ErrorKind::Serialization          => "Serialization",
            ErrorKind::InvalidInput           => "InvalidInput",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error for export and import runs.
/// - `From<T>` impls enable `?` across the pipeline.
/// - `kind()` maps every failure onto the public taxonomy.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("png error: {0}")]
    Png(#[from] PngError),

    /// Vault could not be serialized to or parsed from JSON.
    #[error("vault serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl BackupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BackupError::Io(_) => ErrorKind::Io,
            BackupError::Serialization(_) => ErrorKind::Serialization,
            BackupError::InvalidInput(_) => ErrorKind::InvalidInput,

            BackupError::Crypto(e) => match e {
                CryptoError::EnvelopeTooShort { .. } => ErrorKind::InvalidFormat,
                CryptoError::InvalidUtf8 => ErrorKind::InvalidFormat,
                CryptoError::AuthenticationFailed => ErrorKind::AuthenticationFailed,
                CryptoError::EmptyPassword => ErrorKind::InvalidInput,
            },

            BackupError::Frame(e) => match e {
                FrameError::Truncated { .. } => ErrorKind::InvalidFormat,
                FrameError::InvalidMagic { .. }
                | FrameError::UnsupportedVersion { .. }
                | FrameError::UnsupportedMode { .. } => ErrorKind::UnsupportedFormat,
                FrameError::GeometryMismatch { .. }
                | FrameError::DataLengthOutOfBounds { .. } => ErrorKind::CorruptHeader,
                FrameError::ChecksumMismatch { .. } => ErrorKind::ChecksumMismatch,
                FrameError::PayloadTooLarge { .. } => ErrorKind::InvalidInput,
            },

            BackupError::Png(e) => match e {
                PngError::InvalidSignature | PngError::Malformed(_) => ErrorKind::MalformedPng,
                PngError::UnsupportedCompression(_) => ErrorKind::UnsupportedCompression,
                PngError::UnsupportedFilter { .. } => ErrorKind::UnsupportedFilter,
                PngError::InvalidDimensions { .. }
                | PngError::PixelLengthMismatch { .. } => ErrorKind::InvalidInput,
            },
        }
    }
}
