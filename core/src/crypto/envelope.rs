//! crypto/envelope.rs
//! Authenticated encryption envelope for vault text.
//!
//! Wire layout:
//!
//! ```text
//! [ salt (32) ][ iv (16) ][ ciphertext (N) ][ mac (32) ]
//! ```
//!
//! The MAC is HMAC-SHA256(mac_key, salt || iv || ciphertext). On decrypt the
//! MAC is verified before a single ciphertext byte is decrypted; a wrong
//! password and tampered bytes produce the same error.
//!
//! Progress for both directions is counted in work units: one per key
//! derivation round plus one per payload byte.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::{debug, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::config::CodecConfig;
use crate::constants::envelope::{IV_LEN, MAC_LEN, MIN_LEN, SALT_LEN};
use crate::crypto::cipher::ctr_transform;
use crate::crypto::kdf::derive_keys;
use crate::crypto::mac::{verify_mac, HmacSha256};
use crate::crypto::types::CryptoError;
use crate::progress::{Phase, ProgressReporter};

/// Borrowed view over the fields of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeView<'a> {
    pub salt: &'a [u8; SALT_LEN],
    pub iv: &'a [u8; IV_LEN],
    pub ciphertext: &'a [u8],
    pub mac: &'a [u8],
}

impl<'a> EnvelopeView<'a> {
    /// Split an envelope by fixed offsets.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CryptoError> {
        let too_short = || CryptoError::EnvelopeTooShort { have: bytes.len(), need: MIN_LEN };
        if bytes.len() < MIN_LEN {
            return Err(too_short());
        }

        let (salt, rest) = bytes.split_at(SALT_LEN);
        let (iv, rest) = rest.split_at(IV_LEN);
        let (ciphertext, mac) = rest.split_at(rest.len() - MAC_LEN);

        Ok(Self {
            salt: salt.try_into().map_err(|_| too_short())?,
            iv: iv.try_into().map_err(|_| too_short())?,
            ciphertext,
            mac,
        })
    }

    /// Bytes covered by the MAC: everything but the trailing tag.
    pub fn authenticated_len(&self) -> usize {
        SALT_LEN + IV_LEN + self.ciphertext.len()
    }
}

/// Password-based encrypt/decrypt of vault text.
#[derive(Debug, Clone, Default)]
pub struct VaultCodec {
    config: CodecConfig,
}

impl VaultCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encrypt `text` under `password` with salt and IV from the OS RNG.
    pub fn encrypt(
        &self,
        text: &str,
        password: &str,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_with_rng(text, password, &mut OsRng, reporter)
    }

    /// Encrypt with a caller-supplied secure random source.
    ///
    /// Draws a 32-byte salt and a 16-byte IV from `rng`, derives both keys,
    /// runs the counter-mode keystream over `text` in `cipher_chunk_size`
    /// pieces and appends the HMAC tag.
    ///
    /// # Returns
    /// `salt || iv || ciphertext || mac`, exactly `80 + text.len()` bytes.
    pub fn encrypt_with_rng<R>(
        &self,
        text: &str,
        password: &str,
        rng: &mut R,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Vec<u8>, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut iv);

        let plaintext = text.as_bytes();
        let rounds = u64::from(self.config.kdf_rounds.max(1));
        let total = rounds + plaintext.len() as u64;

        let keys = derive_keys(
            password,
            &salt,
            self.config.kdf_rounds,
            self.config.kdf_progress_every,
            |done| reporter.report(Phase::Encrypt, u64::from(done), total),
        )?;

        let ciphertext = ctr_transform(
            &keys.cipher_key,
            &iv,
            plaintext,
            self.config.cipher_chunk_size,
            |done| reporter.report(Phase::Encrypt, rounds + done as u64, total),
        );

        let mut out = Vec::with_capacity(MIN_LEN + ciphertext.len());
        out.extend_from_slice(&salt);
        out.extend_from_slice(&iv);
        out.extend_from_slice(&ciphertext);

        let mut mac = HmacSha256::new(keys.mac_key.as_bytes());
        mac.update(&out);
        out.extend_from_slice(&mac.finalize());

        reporter.complete(Phase::Encrypt, total);
        debug!(plaintext_len = plaintext.len(), envelope_len = out.len(), "envelope sealed");
        Ok(out)
    }

    /// Verify and decrypt an envelope produced by `encrypt`.
    ///
    /// Design notes:
    /// - The MAC covers `salt || iv || ciphertext` and is checked in constant
    ///   time before any keystream is applied.
    /// - `decrypt` progress reaches 100% only once the plaintext is known to be
    ///   valid UTF-8.
    ///
    /// # Returns
    /// The vault text, wiped from memory when the caller drops it.
    ///
    /// # Errors
    /// - `EnvelopeTooShort` below 80 bytes
    /// - `EmptyPassword`
    /// - `AuthenticationFailed` for a wrong password, wrong KDF rounds, or any
    ///   modified byte
    /// - `InvalidUtf8` if authenticated bytes are not text
    pub fn decrypt(
        &self,
        envelope: &[u8],
        password: &str,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Zeroizing<String>, CryptoError> {
        let view = EnvelopeView::parse(envelope)?;

        let rounds = u64::from(self.config.kdf_rounds.max(1));
        let total = rounds + view.ciphertext.len() as u64;

        let keys = derive_keys(
            password,
            view.salt,
            self.config.kdf_rounds,
            self.config.kdf_progress_every,
            |done| reporter.report(Phase::Decrypt, u64::from(done), total),
        )?;

        let mut mac = HmacSha256::new(keys.mac_key.as_bytes());
        mac.update(&envelope[..view.authenticated_len()]);
        if !verify_mac(&mac.finalize(), view.mac) {
            warn!(envelope_len = envelope.len(), "envelope authentication failed");
            return Err(CryptoError::AuthenticationFailed);
        }

        let plaintext = ctr_transform(
            &keys.cipher_key,
            view.iv,
            view.ciphertext,
            self.config.cipher_chunk_size,
            |done| reporter.report(Phase::Decrypt, rounds + done as u64, total),
        );

        let text = String::from_utf8(plaintext).map_err(|e| {
            e.into_bytes().zeroize();
            CryptoError::InvalidUtf8
        })?;
        reporter.complete(Phase::Decrypt, total);
        debug!(plaintext_len = text.len(), "envelope opened");
        Ok(Zeroizing::new(text))
    }
}
