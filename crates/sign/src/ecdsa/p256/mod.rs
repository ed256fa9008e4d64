//! ECDSA implementation for NIST P-256 curve
//!
//! This implementation follows FIPS 186-4, Section 6 over caller-supplied
//! 32-byte digests. Nonces come from RFC 6979 by default; hedged and purely
//! random nonces are available through [`SignerConfig`].

mod config;
pub mod fault;
mod nonce;

pub use config::{NonceStrategy, SignerConfig, DEFAULT_MAX_ATTEMPTS};
pub use fault::{FaultModel, FaultPair, ObservedSignature};
pub use nonce::{NonceSource, RandomNonce, Rfc6979Nonce};

use core::fmt;
use ecsig_algorithms::ec::p256 as ec;
use ecsig_params::traditional::ecdsa::ECDSA_P256_SIGNATURE_SIZE;
use ecsig_api::{
    Digest32, DigestSigner, DigestVerifier, Error as ApiError, Result as ApiResult,
    Signature as SignatureTrait, SignatureBytes,
};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ECDSA signature scheme using NIST P-256 curve (secp256r1)
pub struct EcdsaP256;

/// P-256 public key: a non-identity curve point Q = d·G
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaP256PublicKey(ec::Point);

/// P-256 secret key
///
/// The scalar d satisfies 1 ≤ d ≤ n − 1. It is zeroized on drop, never
/// printed and not byte-accessible from outside the crate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EcdsaP256SecretKey {
    raw: ec::Scalar,
}

/// P-256 signature (r, s), both in [1, n − 1]
///
/// Encoded as 64 bytes: big-endian r followed by big-endian s.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EcdsaP256Signature(SignatureBytes);

/* ------------------------------------------------------------------------- */
/*                                  Keys                                     */
/* ------------------------------------------------------------------------- */

impl EcdsaP256SecretKey {
    /// Parse a big-endian private scalar, rejecting 0 and values ≥ n
    pub fn from_bytes(bytes: &[u8; ec::P256_SCALAR_SIZE]) -> ApiResult<Self> {
        let raw = ec::Scalar::new_nonzero(bytes)
            .map_err(|e| ApiError::from(e).with_context("EcdsaP256SecretKey"))?;
        Ok(Self { raw })
    }

    /// Parse from a slice of exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> ApiResult<Self> {
        let raw = ec::Scalar::deserialize(bytes)
            .map_err(|e| ApiError::from(e).with_context("EcdsaP256SecretKey"))?;
        Ok(Self { raw })
    }

    /// Generate a uniformly random key in [1, n − 1]
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> ApiResult<Self> {
        let raw = ec::Scalar::random_nonzero(rng)
            .map_err(|e| ApiError::from(e).with_context("EcdsaP256SecretKey::generate"))?;
        Ok(Self { raw })
    }

    /// Derive the public key Q = d·G
    pub fn public_key(&self) -> ApiResult<EcdsaP256PublicKey> {
        let point = ec::scalar_mult_base_g(&self.raw)?;
        Ok(EcdsaP256PublicKey(point))
    }

    pub(crate) fn from_scalar(raw: ec::Scalar) -> Self {
        Self { raw }
    }

    pub(crate) fn scalar(&self) -> &ec::Scalar {
        &self.raw
    }
}

impl fmt::Debug for EcdsaP256SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaP256SecretKey([REDACTED])")
    }
}

impl EcdsaP256PublicKey {
    /// Parse a SEC1 encoding (uncompressed or compressed)
    ///
    /// The identity encoding is rejected: it is never a valid public key.
    pub fn from_sec1_bytes(bytes: &[u8]) -> ApiResult<Self> {
        let point = ec::Point::from_sec1_bytes(bytes)?;
        if point.is_identity() {
            return Err(ApiError::InvalidPoint {
                context: "EcdsaP256PublicKey",
                message: "identity is not a valid public key".to_string(),
            });
        }
        Ok(Self(point))
    }

    /// SEC1 uncompressed encoding: 0x04 ‖ x ‖ y
    pub fn to_uncompressed(&self) -> [u8; ec::P256_POINT_UNCOMPRESSED_SIZE] {
        self.0.serialize_uncompressed()
    }

    /// SEC1 compressed encoding: 0x02/0x03 ‖ x
    pub fn to_compressed(&self) -> [u8; ec::P256_POINT_COMPRESSED_SIZE] {
        self.0.serialize_compressed()
    }

    /// The underlying curve point
    pub fn as_point(&self) -> &ec::Point {
        &self.0
    }
}

/* ------------------------------------------------------------------------- */
/*                                Signature                                  */
/* ------------------------------------------------------------------------- */

impl EcdsaP256Signature {
    fn from_scalars(r: &ec::Scalar, s: &ec::Scalar) -> Self {
        Self(SignatureBytes::from_components(&r.to_bytes(), &s.to_bytes()))
    }

    /// Parse 64 bytes, checking that r and s both lie in [1, n − 1]
    pub fn from_bytes(bytes: &SignatureBytes) -> ApiResult<Self> {
        Self::parse_component(&bytes.r(), "r out of range")?;
        Self::parse_component(&bytes.s(), "s out of range")?;
        Ok(Self(*bytes))
    }

    /// Parse from a slice of exactly 64 bytes
    pub fn from_slice(bytes: &[u8]) -> ApiResult<Self> {
        Self::from_bytes(&SignatureBytes::from_slice(bytes)?)
    }

    /// Big-endian r
    pub fn r(&self) -> [u8; ec::P256_SCALAR_SIZE] {
        self.0.r()
    }

    /// Big-endian s
    pub fn s(&self) -> [u8; ec::P256_SCALAR_SIZE] {
        self.0.s()
    }

    /// The 64-byte `r ‖ s` encoding
    pub fn to_bytes(&self) -> [u8; ECDSA_P256_SIGNATURE_SIZE] {
        *self.0.as_bytes()
    }

    /// 128 uppercase hex characters
    pub fn to_hex_upper(&self) -> String {
        self.0.to_hex_upper()
    }

    fn parse_component(bytes: &[u8; 32], message: &'static str) -> ApiResult<ec::Scalar> {
        ec::Scalar::new_nonzero(bytes).map_err(|_| ApiError::InvalidSignature {
            context: "ECDSA-P256 signature",
            message: message.to_string(),
        })
    }
}

impl From<EcdsaP256Signature> for SignatureBytes {
    fn from(sig: EcdsaP256Signature) -> Self {
        sig.0
    }
}

impl AsRef<[u8]> for EcdsaP256Signature {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl fmt::Display for EcdsaP256Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_upper())
    }
}

/* ------------------------------------------------------------------------- */
/*                             Core algorithms                               */
/* ------------------------------------------------------------------------- */

impl EcdsaP256 {
    /// Sign `digest` drawing nonces from `nonces`
    ///
    /// Algorithm:
    /// 1. e = digest mod n
    /// 2. k from the nonce source
    /// 3. (x₁, y₁) = k·G, r = x₁ mod n; if r = 0 draw a new k
    /// 4. s = k⁻¹(e + rd) mod n; if s = 0 draw a new k
    /// 5. Return (r, s)
    ///
    /// At most `max_attempts` nonces are drawn, and at least one; after that
    /// the call fails with `NonceExhausted`. Errors from the nonce source
    /// propagate as-is.
    pub fn sign_with_nonces<N: NonceSource>(
        digest: &Digest32,
        secret_key: &EcdsaP256SecretKey,
        nonces: &mut N,
        max_attempts: u32,
    ) -> ApiResult<EcdsaP256Signature> {
        let max_attempts = max_attempts.max(1);
        let d = secret_key.scalar();
        let e = ec::Scalar::from_bytes_reduced(digest.as_bytes());

        for attempt in 1..=max_attempts {
            let k = nonces.next_nonce()?;

            let kg = ec::scalar_mult_base_g(&k)?;
            let r = ec::Scalar::from_bytes_reduced(&kg.x_coordinate_bytes());
            if r.is_zero() {
                debug!(attempt, reason = "r is zero", "ECDSA-P256 sign retry");
                continue;
            }

            let k_inv = k.invert()?;
            let s = k_inv.mul(&e.add(&r.mul(d)));
            if s.is_zero() {
                debug!(attempt, reason = "s is zero", "ECDSA-P256 sign retry");
                continue;
            }

            trace!(attempt, "ECDSA-P256 signature produced");
            return Ok(EcdsaP256Signature::from_scalars(&r, &s));
        }

        warn!(attempts = max_attempts, "ECDSA-P256 nonce attempts exhausted");
        Err(ApiError::NonceExhausted {
            attempts: max_attempts,
        })
    }

    /// Verify (r, s) over `digest` under `public_key`
    ///
    /// Algorithm:
    /// 1. Check r, s ∈ [1, n − 1]
    /// 2. w = s⁻¹, u₁ = e·w, u₂ = r·w
    /// 3. X = u₁·G + u₂·Q; reject the identity
    /// 4. Accept iff X.x mod n = r
    fn verify_digest_raw(
        digest: &Digest32,
        signature: &SignatureBytes,
        public_key: &EcdsaP256PublicKey,
    ) -> ApiResult<()> {
        let r = EcdsaP256Signature::parse_component(&signature.r(), "r out of range")?;
        let s = EcdsaP256Signature::parse_component(&signature.s(), "s out of range")?;
        let e = ec::Scalar::from_bytes_reduced(digest.as_bytes());

        let w = s.invert()?;
        let u1 = e.mul(&w);
        let u2 = r.mul(&w);

        let point = ec::base_point_g().mul_add(&u1, public_key.as_point(), &u2);
        if point.is_identity() {
            return Err(ApiError::InvalidSignature {
                context: "ECDSA-P256 verify",
                message: "verification point is identity".to_string(),
            });
        }

        let v = ec::Scalar::from_bytes_reduced(&point.x_coordinate_bytes());
        if !bool::from(v.to_bytes().ct_eq(&r.to_bytes())) {
            return Err(ApiError::InvalidSignature {
                context: "ECDSA-P256 verify",
                message: "signature verification failed".to_string(),
            });
        }
        Ok(())
    }
}

impl SignatureTrait for EcdsaP256 {
    type PublicKey = EcdsaP256PublicKey;
    type SecretKey = EcdsaP256SecretKey;
    type SignatureData = EcdsaP256Signature;
    type KeyPair = (Self::PublicKey, Self::SecretKey);

    fn name() -> &'static str {
        "ECDSA-P256"
    }

    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> ApiResult<Self::KeyPair> {
        let secret_key = EcdsaP256SecretKey::generate(rng)?;
        let public_key = secret_key.public_key()?;
        Ok((public_key, secret_key))
    }

    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey {
        keypair.0.clone()
    }

    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey {
        keypair.1.clone()
    }

    /// Sign with the default configuration: RFC 6979, ten attempts,
    /// post-sign verification on
    fn sign(digest: &Digest32, secret_key: &Self::SecretKey) -> ApiResult<Self::SignatureData> {
        EcdsaP256Signer::new(secret_key.clone(), SignerConfig::default())?.sign(digest)
    }

    fn verify(
        digest: &Digest32,
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> ApiResult<()> {
        Self::verify_digest_raw(digest, &signature.0, public_key)
    }
}

/* ------------------------------------------------------------------------- */
/*                           Signer and verifier                             */
/* ------------------------------------------------------------------------- */

/// A secret key bound to a [`SignerConfig`]
///
/// The public key is derived once at construction and used for the
/// post-sign self check.
#[derive(Clone)]
pub struct EcdsaP256Signer {
    secret: EcdsaP256SecretKey,
    public: EcdsaP256PublicKey,
    config: SignerConfig,
}

impl EcdsaP256Signer {
    /// Bind `secret` to `config`
    pub fn new(secret: EcdsaP256SecretKey, config: SignerConfig) -> ApiResult<Self> {
        let public = secret.public_key()?;
        Ok(Self {
            secret,
            public,
            config,
        })
    }

    /// The public key matching this signer
    pub fn public_key(&self) -> &EcdsaP256PublicKey {
        &self.public
    }

    /// The active configuration
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// Sign, taking entropy for hedged or random nonces from the OS
    pub fn sign(&self, digest: &Digest32) -> ApiResult<EcdsaP256Signature> {
        self.sign_with_rng(digest, &mut OsRng)
    }

    /// Sign, taking entropy for hedged or random nonces from `rng`
    ///
    /// `rng` is not touched by the deterministic strategy.
    pub fn sign_with_rng<R: CryptoRng + RngCore>(
        &self,
        digest: &Digest32,
        rng: &mut R,
    ) -> ApiResult<EcdsaP256Signature> {
        let max_attempts = self.config.max_attempts;
        let signature = match self.config.nonce {
            NonceStrategy::Deterministic => {
                let mut nonces = Rfc6979Nonce::new(self.secret.scalar(), digest)?;
                EcdsaP256::sign_with_nonces(digest, &self.secret, &mut nonces, max_attempts)?
            }
            NonceStrategy::Hedged => {
                let mut nonces = Rfc6979Nonce::hedged(self.secret.scalar(), digest, rng)?;
                EcdsaP256::sign_with_nonces(digest, &self.secret, &mut nonces, max_attempts)?
            }
            NonceStrategy::Random => {
                let mut nonces = RandomNonce::new(rng);
                EcdsaP256::sign_with_nonces(digest, &self.secret, &mut nonces, max_attempts)?
            }
        };

        if self.config.verify_after_sign {
            self.check(digest, &signature)?;
        }
        Ok(signature)
    }

    /// Withhold any signature that does not verify under our own key
    fn check(&self, digest: &Digest32, signature: &EcdsaP256Signature) -> ApiResult<()> {
        if EcdsaP256::verify_digest_raw(digest, &signature.0, &self.public).is_err() {
            warn!("ECDSA-P256 post-sign verification failed, signature withheld");
            return Err(ApiError::FaultDetected {
                context: "ECDSA-P256 sign",
            });
        }
        Ok(())
    }
}

impl fmt::Debug for EcdsaP256Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaP256Signer")
            .field("public", &self.public)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DigestSigner for EcdsaP256Signer {
    fn sign_digest(&self, digest: &Digest32) -> ApiResult<SignatureBytes> {
        self.sign(digest).map(SignatureBytes::from)
    }
}

impl DigestVerifier for EcdsaP256PublicKey {
    fn verify_digest(&self, digest: &Digest32, signature: &SignatureBytes) -> ApiResult<()> {
        EcdsaP256::verify_digest_raw(digest, signature, self)
    }
}
