//! Integration tests for ECDSA P-256 signing through the public facade

use ecsig::algorithms::p256::{scalar_mult_base_g, Scalar};
use ecsig::prelude::*;
use ecsig::sign::fault::{is_deterministic, recover_key, DETERMINISM_ROUNDS};
use ecsig::sign::{FaultModel, FaultPair, RandomNonce, Rfc6979Nonce};
use ecsig_tests::doubles::{DeadRng, FailingSigner, GlitchedSigner, MockSigner, StuckRng};
use ecsig_tests::logging::capture;
use ecsig_tests::vectors::{
    bytes32, FIXED_DIGEST, FIXED_SIGNATURE_HEX, RFC6979_KEY, RFC6979_PUBLIC, RFC6979_SHA256,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest as _, Sha256};

fn rfc_signer(config: SignerConfig) -> EcdsaP256Signer {
    let key = EcdsaP256SecretKey::from_bytes(&bytes32(RFC6979_KEY)).unwrap();
    EcdsaP256Signer::new(key, config).unwrap()
}

/// Sign the fixed digest into caller buffers and render it the way the
/// reference harness does
fn harness_output<S: DigestSigner>(signer: &S) -> Result<String> {
    let mut signature = [0u8; 64];
    sign_into(signer, &mut signature, &FIXED_DIGEST)?;
    Ok(hex::encode_upper(signature))
}

#[test]
fn test_harness_scenario_prints_fixture() {
    let signer = rfc_signer(SignerConfig::default());
    assert_eq!(harness_output(&signer).unwrap(), FIXED_SIGNATURE_HEX);

    let sig = signer.sign(&Digest32::new(FIXED_DIGEST)).unwrap();
    assert_eq!(sig.to_hex_upper(), FIXED_SIGNATURE_HEX);
    assert_eq!(sig.to_hex_upper().len(), 128);
}

#[test]
fn test_harness_scenario_with_mock_signer() {
    let mock = MockSigner::new([0x0F; 64]);
    assert_eq!(harness_output(&mock).unwrap(), "0F".repeat(64));
    assert_eq!(mock.calls(), 1);
}

#[test]
fn test_harness_scenario_propagates_failure() {
    let failing = FailingSigner(Error::NonceExhausted { attempts: 10 });
    assert_eq!(
        harness_output(&failing).unwrap_err(),
        Error::NonceExhausted { attempts: 10 }
    );

    // Through a trait object as well
    let dynamic: &dyn DigestSigner = &failing;
    let mut out = [0x77u8; 64];
    assert!(sign_into(dynamic, &mut out, &FIXED_DIGEST).is_err());
    assert_eq!(out, [0x77; 64]);
}

#[test]
fn test_rfc6979_vectors_through_facade() {
    let signer = rfc_signer(SignerConfig::default());
    let (ux, uy) = RFC6979_PUBLIC;
    let public = signer.public_key().to_uncompressed();
    assert_eq!(&public[1..33], &bytes32(ux));
    assert_eq!(&public[33..], &bytes32(uy));

    for vector in RFC6979_SHA256 {
        let digest = Digest32::from_slice(&Sha256::digest(vector.message)).unwrap();
        let key = EcdsaP256SecretKey::from_bytes(&bytes32(RFC6979_KEY)).unwrap();

        let k = {
            let scalar_key = Scalar::new_nonzero(&bytes32(RFC6979_KEY)).unwrap();
            Rfc6979Nonce::new(&scalar_key, &digest)
                .unwrap()
                .next_nonce()
                .unwrap()
        };
        assert_eq!(k.to_bytes(), bytes32(vector.k));

        let sig = EcdsaP256::sign(&digest, &key).unwrap();
        assert_eq!(sig.r(), bytes32(vector.r));
        assert_eq!(sig.s(), bytes32(vector.s));
        signer
            .public_key()
            .verify_digest(&digest, &sig.into())
            .unwrap();
    }
}

#[test]
fn test_entropy_failures_surface() {
    for strategy in [NonceStrategy::Hedged, NonceStrategy::Random] {
        let signer = rfc_signer(SignerConfig::default().with_nonce(strategy));
        let err = signer
            .sign_with_rng(&Digest32::new(FIXED_DIGEST), &mut DeadRng)
            .unwrap_err();
        assert!(matches!(err, Error::EntropyUnavailable { .. }), "{err}");
    }

    let mut dead = DeadRng;
    let mut source = RandomNonce::new(&mut dead);
    assert!(matches!(
        source.next_nonce(),
        Err(Error::EntropyUnavailable { .. })
    ));
}

#[test]
fn test_stuck_entropy_source_terminates() {
    let signer = rfc_signer(SignerConfig::default().with_nonce(NonceStrategy::Random));
    for byte in [0xFF, 0x00] {
        let err = signer
            .sign_with_rng(&Digest32::new(FIXED_DIGEST), &mut StuckRng(byte))
            .unwrap_err();
        assert!(matches!(err, Error::EntropyUnavailable { .. }), "{err}");
    }
    assert!(matches!(
        EcdsaP256::keypair(&mut StuckRng(0xFF)),
        Err(Error::EntropyUnavailable { .. })
    ));
}

#[test]
fn test_zero_attempt_config_from_json_still_signs() {
    let config: SignerConfig = serde_json::from_str(r#"{"max_attempts":0}"#).unwrap();
    let sig = rfc_signer(config)
        .sign(&Digest32::new(FIXED_DIGEST))
        .unwrap();
    assert_eq!(sig.to_hex_upper(), FIXED_SIGNATURE_HEX);
}

#[test]
fn test_key_recovered_from_glitched_nonce() {
    let honest = rfc_signer(SignerConfig::default());
    let public = honest.public_key().clone();
    assert!(is_deterministic(&honest, &Digest32::new(FIXED_DIGEST), DETERMINISM_ROUNDS).unwrap());

    let glitched = GlitchedSigner::new(&bytes32(RFC6979_KEY), &[0x01; 32]).unwrap();
    let pairs: Vec<FaultPair> = [[0xAA; 32], [0xBB; 32]]
        .into_iter()
        .map(|bytes| {
            let digest = Digest32::new(bytes);
            let good = honest.sign_digest(&digest).unwrap();
            let bad = glitched.sign_digest(&digest).unwrap();
            // The released faulty signature does not verify
            assert!(public.verify_digest(&digest, &bad).is_err());
            FaultPair::new(&digest, &good, &bad)
        })
        .collect();

    let (model, key) = recover_key(&public, &pairs, &[FaultModel::DifferentialNonce]).unwrap();
    assert_eq!(model, FaultModel::DifferentialNonce);
    assert_eq!(key.public_key().unwrap(), public);

    let (_, key) = recover_key(&public, &pairs, &FaultModel::ALL).unwrap();
    assert_eq!(key.public_key().unwrap(), public);

    // A single pair is not enough for this fault location
    assert!(recover_key(&public, &pairs[..1], &FaultModel::ALL).is_none());
}

#[test]
fn test_exhaustion_is_logged_without_secrets() {
    // Secret key 1 and a digest chosen so that nonce 7 always gives s = 0
    let key_bytes = {
        let mut b = [0u8; 32];
        b[31] = 1;
        b
    };
    let key = EcdsaP256SecretKey::from_bytes(&key_bytes).unwrap();
    let mut k_bytes = [0u8; 32];
    k_bytes[31] = 7;
    let k = Scalar::new_nonzero(&k_bytes).unwrap();
    let r = Scalar::from_bytes_reduced(&scalar_mult_base_g(&k).unwrap().x_coordinate_bytes());
    let digest = Digest32::new(r.negate().to_bytes());

    struct Repeat(Scalar);
    impl NonceSource for Repeat {
        fn next_nonce(&mut self) -> Result<Scalar> {
            Ok(self.0.clone())
        }
    }

    let (result, logs) = capture("ecsig_sign=debug", || {
        EcdsaP256::sign_with_nonces(&digest, &key, &mut Repeat(k.clone()), 4)
    });

    assert_eq!(result.unwrap_err(), Error::NonceExhausted { attempts: 4 });
    assert_eq!(logs.matches("ECDSA-P256 sign retry").count(), 4);
    assert!(logs.contains("s is zero"));
    assert!(logs.contains("WARN"));
    assert!(logs.contains("nonce attempts exhausted"));
    assert!(!logs.to_uppercase().contains(&hex::encode_upper(k.to_bytes())));
}

#[test]
fn test_successful_sign_logs_nothing_at_debug() {
    let signer = rfc_signer(SignerConfig::default());
    let (sig, logs) = capture("ecsig_sign=debug", || {
        signer.sign(&Digest32::new(FIXED_DIGEST))
    });
    assert!(sig.is_ok());
    assert!(logs.is_empty(), "unexpected log output: {logs}");

    let (_, trace_logs) = capture("ecsig_sign=trace", || {
        signer.sign(&Digest32::new(FIXED_DIGEST))
    });
    assert!(trace_logs.contains("signature produced"));
    assert!(!trace_logs.contains(&RFC6979_KEY.to_lowercase()));
    assert!(!trace_logs.contains(RFC6979_KEY));
}

#[test]
fn test_config_from_json() {
    let config: SignerConfig =
        serde_json::from_str(r#"{"nonce":"hedged","max_attempts":3,"verify_after_sign":false}"#)
            .unwrap();
    assert_eq!(
        config,
        SignerConfig::default()
            .with_nonce(NonceStrategy::Hedged)
            .with_max_attempts(3)
            .with_verify_after_sign(false)
    );

    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let signer = rfc_signer(config);
    let sig = signer
        .sign_with_rng(&Digest32::new(FIXED_DIGEST), &mut rng)
        .unwrap();
    EcdsaP256::verify(&Digest32::new(FIXED_DIGEST), &sig, signer.public_key()).unwrap();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_every_strategy_verifies(seed in any::<u64>(), digest in any::<[u8; 32]>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let (public, secret) = EcdsaP256::keypair(&mut rng).unwrap();
        let digest = Digest32::new(digest);

        for strategy in [NonceStrategy::Deterministic, NonceStrategy::Hedged, NonceStrategy::Random] {
            let signer = EcdsaP256Signer::new(
                secret.clone(),
                SignerConfig::default().with_nonce(strategy),
            ).unwrap();
            let sig = signer.sign_with_rng(&digest, &mut rng).unwrap();
            prop_assert!(EcdsaP256::verify(&digest, &sig, &public).is_ok());
        }
    }
}
