// Envelope: salt || iv || ciphertext || mac, authenticated before decryption.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use zeroize::Zeroizing;

    use pixelvault_core::config::CodecConfig;
    use pixelvault_core::crypto::{CryptoError, EnvelopeView, VaultCodec};
    use pixelvault_core::progress::{Phase, ProgressEvent, ProgressReporter};
    use pixelvault_core::types::{BackupError, ErrorKind};

    fn fast_codec() -> VaultCodec {
        VaultCodec::new(CodecConfig { kdf_rounds: 64, kdf_progress_every: 16, ..CodecConfig::default() })
    }

    fn silent() -> ProgressReporter<'static> {
        ProgressReporter::silent()
    }

    #[test]
    fn hello_world_round_trip_with_default_rounds() {
        let codec = VaultCodec::default();
        let env = codec.encrypt("hello world", "pw1", &mut silent()).unwrap();
        assert_eq!(env.len(), 32 + 16 + "hello world".len() + 32);

        assert_eq!(codec.decrypt(&env, "pw1", &mut silent()).unwrap().as_str(), "hello world");
        assert_eq!(
            codec.decrypt(&env, "pw2", &mut silent()).unwrap_err(),
            CryptoError::AuthenticationFailed
        );
    }

    #[test]
    fn empty_plaintext_produces_minimal_envelope() {
        let codec = fast_codec();
        let env = codec.encrypt("", "pw", &mut silent()).unwrap();
        assert_eq!(env.len(), 80);
        assert_eq!(codec.decrypt(&env, "pw", &mut silent()).unwrap().as_str(), "");
    }

    #[test]
    fn fresh_salt_and_iv_per_encryption() {
        let codec = fast_codec();
        let a = codec.encrypt("same", "pw", &mut silent()).unwrap();
        let b = codec.encrypt("same", "pw", &mut silent()).unwrap();
        assert_ne!(a[..48], b[..48]);
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let codec = fast_codec();
        let a = codec
            .encrypt_with_rng("vault", "pw", &mut StdRng::seed_from_u64(9), &mut silent())
            .unwrap();
        let b = codec
            .encrypt_with_rng("vault", "pw", &mut StdRng::seed_from_u64(9), &mut silent())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn short_envelope_is_invalid_format() {
        let err = fast_codec().decrypt(&[0u8; 79], "pw", &mut silent()).unwrap_err();
        assert_eq!(err, CryptoError::EnvelopeTooShort { have: 79, need: 80 });
        assert_eq!(BackupError::from(err).kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn view_splits_fixed_offsets() {
        let env: Vec<u8> = (0..=99u8).collect();
        let view = EnvelopeView::parse(&env).unwrap();
        assert_eq!(view.salt[0], 0);
        assert_eq!(view.iv[0], 32);
        assert_eq!(view.ciphertext, &env[48..68]);
        assert_eq!(view.mac, &env[68..]);
        assert_eq!(view.authenticated_len(), 68);
    }

    #[test]
    fn empty_password_is_rejected_both_ways() {
        let codec = fast_codec();
        assert_eq!(codec.encrypt("x", "", &mut silent()).unwrap_err(), CryptoError::EmptyPassword);
        let env = codec.encrypt("x", "pw", &mut silent()).unwrap();
        assert_eq!(codec.decrypt(&env, "", &mut silent()).unwrap_err(), CryptoError::EmptyPassword);
    }

    #[test]
    fn encrypt_reports_monotonic_progress_to_completion() {
        let events = RefCell::new(Vec::new());
        let mut reporter = ProgressReporter::new(|e: &ProgressEvent| events.borrow_mut().push(e.clone()))
            .with_min_interval(Duration::ZERO);
        let text = "x".repeat(40_000);
        fast_codec().encrypt(&text, "pw", &mut reporter).unwrap();
        drop(reporter);

        let events = events.into_inner();
        assert!(events.iter().all(|e| e.phase == Phase::Encrypt));
        assert!(events.windows(2).all(|w| w[0].processed_bytes <= w[1].processed_bytes));
        let last = events.last().unwrap();
        assert_eq!(last.total_bytes, 64 + 40_000);
        assert_eq!(last.percent, 100.0);
    }

    #[test]
    fn failed_decrypt_never_reports_completion() {
        let codec = fast_codec();
        let env = codec.encrypt(&"y".repeat(5_000), "pw", &mut silent()).unwrap();

        let events = RefCell::new(Vec::new());
        let mut reporter = ProgressReporter::new(|e: &ProgressEvent| events.borrow_mut().push(e.clone()))
            .with_min_interval(Duration::ZERO);
        let err = codec.decrypt(&env, "not pw", &mut reporter).unwrap_err();
        assert_eq!(err, CryptoError::AuthenticationFailed);

        let text: Zeroizing<String> = codec.decrypt(&env, "pw", &mut reporter).unwrap();
        assert_eq!(text.len(), 5_000);
        drop(reporter);

        let percents: Vec<f64> = events.into_inner().iter().map(|e| e.percent).collect();
        // one completion, from the second call
        assert_eq!(percents.iter().filter(|p| **p == 100.0).count(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_any_flipped_byte_fails_authentication(idx in 0usize..91, bit in 0u8..8) {
            let codec = fast_codec();
            let mut env = codec.encrypt("hello world", "pw1", &mut silent()).unwrap();
            env[idx] ^= 1 << bit;
            prop_assert_eq!(
                codec.decrypt(&env, "pw1", &mut silent()).unwrap_err(),
                CryptoError::AuthenticationFailed
            );
        }

        #[test]
        fn prop_round_trip(text in "\\PC{0,200}", pw in "[ -~]{1,16}") {
            let codec = fast_codec();
            let env = codec.encrypt(&text, &pw, &mut silent()).unwrap();
            prop_assert_eq!(env.len(), 80 + text.len());
            let decrypted = codec.decrypt(&env, &pw, &mut silent()).unwrap();
            prop_assert_eq!(decrypted.as_str(), text.as_str());
        }
    }
}
