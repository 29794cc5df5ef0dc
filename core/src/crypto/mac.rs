//! crypto/mac.rs
//! HMAC-SHA256 over the envelope prefix.

use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::constants::envelope::MAC_LEN;

/// SHA-256 block size.
const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Keyed HMAC-SHA256 state; feed parts with `update`, close with `finalize`.
#[derive(Clone)]
pub struct HmacSha256 {
    inner: Sha256,
    outer: Sha256,
}

impl HmacSha256 {
    pub fn new(key: &[u8]) -> Self {
        let mut k0 = Zeroizing::new([0u8; BLOCK_SIZE]);
        if key.len() > BLOCK_SIZE {
            Sha256::new()
                .chain_update(key)
                .finalize_into(GenericArray::from_mut_slice(&mut k0[..MAC_LEN]));
        } else {
            k0[..key.len()].copy_from_slice(key);
        }

        let mut ipad = Zeroizing::new([IPAD; BLOCK_SIZE]);
        let mut opad = Zeroizing::new([OPAD; BLOCK_SIZE]);
        for i in 0..BLOCK_SIZE {
            ipad[i] ^= k0[i];
            opad[i] ^= k0[i];
        }

        Self {
            inner: Sha256::new_with_prefix(ipad.as_slice()),
            outer: Sha256::new_with_prefix(opad.as_slice()),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(mut self) -> [u8; MAC_LEN] {
        let mut inner_hash = Zeroizing::new([0u8; MAC_LEN]);
        self.inner
            .finalize_into(GenericArray::from_mut_slice(inner_hash.as_mut_slice()));
        self.outer.update(inner_hash.as_slice());
        self.outer.finalize().into()
    }
}

/// One-shot HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; MAC_LEN] {
    let mut mac = HmacSha256::new(key);
    mac.update(data);
    mac.finalize()
}

/// Compare a computed tag with the received one in constant time.
pub fn verify_mac(expected: &[u8; MAC_LEN], received: &[u8]) -> bool {
    if received.len() != MAC_LEN {
        return false;
    }
    expected.as_slice().ct_eq(received).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4231 test case 2
    #[test]
    fn rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    // RFC 4231 test case 6: key longer than the block size
    #[test]
    fn rfc4231_case_6_long_key() {
        let key = [0xaau8; 131];
        let tag = hmac_sha256(&key, b"Test Using Larger Than Block-Size Key - Hash Key First");
        assert_eq!(
            hex::encode(tag),
            "60e431591ee0b67f0d8a26aacbf5b77f8e0bc6213728c5140546040f0ee37f54"
        );
    }

    #[test]
    fn incremental_equals_one_shot() {
        let mut mac = HmacSha256::new(b"k");
        mac.update(b"hello ");
        mac.update(b"world");
        assert_eq!(mac.finalize(), hmac_sha256(b"k", b"hello world"));
    }

    #[test]
    fn verify_rejects_wrong_length_and_flipped_bit() {
        let tag = hmac_sha256(b"k", b"m");
        assert!(verify_mac(&tag, &tag));
        assert!(!verify_mac(&tag, &tag[..31]));
        let mut bad = tag;
        bad[31] ^= 1;
        assert!(!verify_mac(&tag, &bad));
        assert!(!verify_mac(&tag, &[tag.as_slice(), &[0u8]].concat()));
    }
}
