// Key derivation: iterated SHA-256 with a domain-separated MAC key.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sha2::{Digest, Sha256};

    use pixelvault_core::crypto::{derive_keys, CryptoError};

    const SALT: [u8; 32] = [7u8; 32];

    fn derive(password: &str, salt: &[u8; 32], rounds: u32) -> ([u8; 32], [u8; 32]) {
        let keys = derive_keys(password, salt, rounds, 1_000, |_| {}).unwrap();
        (*keys.cipher_key.as_bytes(), *keys.mac_key.as_bytes())
    }

    #[test]
    fn cipher_key_is_hash_chain_over_password_and_salt() {
        let mut seed: [u8; 32] = Sha256::new()
            .chain_update(b"pw1")
            .chain_update(SALT)
            .finalize()
            .into();
        for _ in 1..3 {
            seed = Sha256::digest(seed).into();
        }
        let (cipher_key, _) = derive("pw1", &SALT, 3);
        assert_eq!(cipher_key, seed);
    }

    #[test]
    fn mac_key_binds_seed_salt_and_domain_byte() {
        let (cipher_key, mac_key) = derive("pw1", &SALT, 10);
        let expected: [u8; 32] = Sha256::new()
            .chain_update(cipher_key)
            .chain_update(SALT)
            .chain_update([0x01])
            .finalize()
            .into();
        assert_eq!(mac_key, expected);
        assert_ne!(cipher_key, mac_key);
    }

    #[test]
    fn salt_and_password_change_both_keys() {
        let base = derive("pw1", &SALT, 50);
        assert_ne!(base, derive("pw2", &SALT, 50));
        assert_ne!(base, derive("pw1", &[8u8; 32], 50));
        assert_ne!(base, derive("pw1", &SALT, 51));
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = derive_keys("", &SALT, 10, 5, |_| {}).unwrap_err();
        assert_eq!(err, CryptoError::EmptyPassword);
    }

    #[test]
    fn zero_rounds_runs_one_round() {
        assert_eq!(derive("pw", &SALT, 0), derive("pw", &SALT, 1));
    }

    #[test]
    fn progress_ends_at_round_count() {
        let mut seen = Vec::new();
        derive_keys("pw", &SALT, 100_000, 5_000, |r| seen.push(r)).unwrap();
        assert_eq!(seen.len(), 20);
        assert_eq!(seen.first(), Some(&5_000));
        assert_eq!(seen.last(), Some(&100_000));
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_derivation_is_deterministic(pw in "[ -~]{1,24}", salt in any::<[u8; 32]>()) {
            prop_assert_eq!(derive(&pw, &salt, 16), derive(&pw, &salt, 16));
        }
    }
}
