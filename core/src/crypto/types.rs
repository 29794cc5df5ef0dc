//! crypto/types.rs
//! Key material containers and crypto-layer errors.

use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::envelope::KEY_LEN;

/// A 32-byte key that lives only for the duration of one call.
///
/// Bytes are overwritten on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Cipher key and MAC key derived together from one password + salt.
#[derive(Debug, Clone)]
pub struct DerivedKeys {
    pub cipher_key: SecretKey,
    pub mac_key: SecretKey,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Envelope shorter than salt + iv + mac.
    #[error("envelope too short: {have} < {need}")]
    EnvelopeTooShort { have: usize, need: usize },

    /// MAC mismatch: wrong password or tampered data, not distinguished.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Authenticated plaintext is not valid UTF-8.
    #[error("decrypted vault is not valid UTF-8")]
    InvalidUtf8,

    #[error("password must not be empty")]
    EmptyPassword,
}
