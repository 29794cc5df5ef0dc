//! crypto/mod.rs
//! Password-based authenticated encryption for vault text.
//!
//! Layers, leaves first:
//! - `kdf`: password + salt -> (cipher key, MAC key)
//! - `cipher`: AES-256 counter mode, chunked
//! - `mac`: HMAC-SHA256
//! - `envelope`: `salt || iv || ciphertext || mac`

pub mod types;
pub mod kdf;
pub mod cipher;
pub mod mac;
pub mod envelope;

pub use types::*;
pub use kdf::*;
pub use cipher::*;
pub use mac::*;
pub use envelope::*;
