//! config.rs
//! Tunables for the backup codec.
//!
//! Defaults reproduce frame version 2 exactly. `kdf_rounds` is not stored in
//! the file: a backup written with non-default rounds can only be read back
//! with the same config.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CIPHER_BLOCK_LEN, DEFAULT_CIPHER_CHUNK_SIZE, DEFAULT_KDF_PROGRESS_EVERY, DEFAULT_KDF_ROUNDS,
    DEFAULT_PROGRESS_INTERVAL,
};
use crate::types::BackupError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Iterated-hash rounds in key derivation.
    pub kdf_rounds: u32,
    /// Emit a key-derivation progress event every N rounds.
    pub kdf_progress_every: u32,
    /// Counter-mode processing chunk; non-zero multiple of 16.
    pub cipher_chunk_size: usize,
    /// Minimum gap between progress events of one phase.
    pub progress_interval_ms: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            kdf_rounds: DEFAULT_KDF_ROUNDS,
            kdf_progress_every: DEFAULT_KDF_PROGRESS_EVERY,
            cipher_chunk_size: DEFAULT_CIPHER_CHUNK_SIZE,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL.as_millis() as u64,
        }
    }
}

impl CodecConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, BackupError> {
        let config: CodecConfig = serde_json::from_str(json)
            .map_err(|e| BackupError::InvalidInput(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BackupError> {
        if self.kdf_rounds == 0 {
            return Err(BackupError::InvalidInput("kdf_rounds must be at least 1".into()));
        }
        if self.kdf_progress_every == 0 {
            return Err(BackupError::InvalidInput("kdf_progress_every must be at least 1".into()));
        }
        if self.cipher_chunk_size == 0 || self.cipher_chunk_size % CIPHER_BLOCK_LEN != 0 {
            return Err(BackupError::InvalidInput(format!(
                "cipher_chunk_size must be a non-zero multiple of {}, got {}",
                CIPHER_BLOCK_LEN, self.cipher_chunk_size
            )));
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}
