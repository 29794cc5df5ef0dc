//! crypto/cipher.rs
//! AES-256 in counter mode.
//!
//! Design notes:
//! - The 16-byte IV is the initial counter block; the counter is the whole
//!   block read as a big-endian u128 and wraps on overflow.
//! - Keystream position carries across calls, so chunk boundaries never
//!   change the output.
//! - Encryption and decryption are the same operation.

use aes_gcm::aes::cipher::generic_array::GenericArray;
use aes_gcm::aes::cipher::{BlockEncrypt, KeyInit};
use aes_gcm::aes::Aes256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::envelope::IV_LEN;
use crate::constants::CIPHER_BLOCK_LEN;
use crate::crypto::types::SecretKey;

/// Keystream position and the unused tail of the current block are wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CtrCipher {
    #[zeroize(skip)]
    cipher: Aes256,
    counter: u128,
    keystream: [u8; CIPHER_BLOCK_LEN],
    used: usize,
}

impl CtrCipher {
    pub fn new(key: &SecretKey, iv: &[u8; IV_LEN]) -> Self {
        Self {
            cipher: Aes256::new(GenericArray::from_slice(key.as_bytes())),
            counter: u128::from_be_bytes(*iv),
            keystream: [0u8; CIPHER_BLOCK_LEN],
            used: CIPHER_BLOCK_LEN,
        }
    }

    /// XOR the next `data.len()` keystream bytes into `data`.
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.used == CIPHER_BLOCK_LEN {
                self.refill();
            }
            *byte ^= self.keystream[self.used];
            self.used += 1;
        }
    }

    fn refill(&mut self) {
        let mut block = GenericArray::from(self.counter.to_be_bytes());
        self.cipher.encrypt_block(&mut block);
        self.keystream.copy_from_slice(&block);
        block.as_mut_slice().zeroize();
        self.counter = self.counter.wrapping_add(1);
        self.used = 0;
    }
}

/// Run the keystream over `input` in `chunk_size` pieces.
///
/// `on_chunk(processed)` fires after every chunk with the running byte count.
/// Output length always equals input length.
pub fn ctr_transform<F>(
    key: &SecretKey,
    iv: &[u8; IV_LEN],
    input: &[u8],
    chunk_size: usize,
    mut on_chunk: F,
) -> Vec<u8>
where
    F: FnMut(usize),
{
    let mut out = input.to_vec();
    let mut ctr = CtrCipher::new(key, iv);
    let mut processed = 0usize;

    for chunk in out.chunks_mut(chunk_size.max(CIPHER_BLOCK_LEN)) {
        ctr.apply_keystream(chunk);
        processed += chunk.len();
        on_chunk(processed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nist_key() -> SecretKey {
        let mut k = [0u8; 32];
        k.copy_from_slice(
            &hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4").unwrap(),
        );
        SecretKey::from_bytes(k)
    }

    fn nist_iv() -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&hex::decode("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff").unwrap());
        iv
    }

    // NIST SP 800-38A, F.5.5 CTR-AES256.Encrypt, blocks 1 and 2
    #[test]
    fn matches_sp800_38a_vectors() {
        let pt = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
        )
        .unwrap();
        let ct = ctr_transform(&nist_key(), &nist_iv(), &pt, 8192, |_| {});
        assert_eq!(
            hex::encode(ct),
            "601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c5"
        );
    }

    #[test]
    fn chunking_does_not_change_output() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 % 251) as u8).collect();
        let a = ctr_transform(&nist_key(), &nist_iv(), &data, 16, |_| {});
        let b = ctr_transform(&nist_key(), &nist_iv(), &data, 8192, |_| {});
        assert_eq!(a, b);

        let mut c = data.clone();
        let mut ctr = CtrCipher::new(&nist_key(), &nist_iv());
        let (head, tail) = c.split_at_mut(7);
        ctr.apply_keystream(head);
        ctr.apply_keystream(tail);
        assert_eq!(a, c);
    }

    #[test]
    fn zeroize_clears_keystream_state() {
        let mut ctr = CtrCipher::new(&nist_key(), &nist_iv());
        ctr.apply_keystream(&mut [0u8; 5]);
        ctr.zeroize();
        assert_eq!(ctr.keystream, [0u8; CIPHER_BLOCK_LEN]);
        assert_eq!(ctr.counter, 0);
        assert_eq!(ctr.used, 0);
    }
}
