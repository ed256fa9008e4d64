//! Digital signature traits for ecsig
//!
//! Two levels are defined. [`Signature`] describes a scheme as a set of
//! associated key and signature types with static operations. The object
//! level [`DigestSigner`] and [`DigestVerifier`] traits are what a caller
//! holds at runtime, so a harness can be driven by a real key or by a test
//! double through the same interface.

use crate::types::{Digest32, SignatureBytes};
use crate::{Error, Result};
use ecsig_params::traditional::ecdsa::{ECDSA_P256_DIGEST_SIZE, ECDSA_P256_SIGNATURE_SIZE};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Core trait for digest signature algorithms
///
/// Secret keys are opaque: implementations must not expose `AsMut<[u8]>` on
/// them, so key material cannot be corrupted into an out-of-range value.
pub trait Signature {
    /// Public key type for this algorithm
    type PublicKey: Clone;

    /// Secret key type - must be zeroizable but not byte-accessible
    type SecretKey: Zeroize + Clone;

    /// Signature data type
    type SignatureData: Clone;

    /// Key pair type (typically a tuple of public and secret keys)
    type KeyPair;

    /// Returns the name of this signature algorithm
    fn name() -> &'static str;

    /// Generate a new key pair using the provided RNG
    fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self::KeyPair>;

    /// Extract the public key from a key pair
    fn public_key(keypair: &Self::KeyPair) -> Self::PublicKey;

    /// Extract the secret key from a key pair
    fn secret_key(keypair: &Self::KeyPair) -> Self::SecretKey;

    /// Sign a pre-hashed digest with the given secret key
    fn sign(digest: &Digest32, secret_key: &Self::SecretKey) -> Result<Self::SignatureData>;

    /// Verify a signature over a digest
    fn verify(
        digest: &Digest32,
        signature: &Self::SignatureData,
        public_key: &Self::PublicKey,
    ) -> Result<()>;
}

/// Something that can sign a 32-byte digest
pub trait DigestSigner {
    /// Produce the 64-byte `r ‖ s` signature of `digest`
    fn sign_digest(&self, digest: &Digest32) -> Result<SignatureBytes>;
}

/// Something that can check a 64-byte signature over a 32-byte digest
pub trait DigestVerifier {
    /// `Ok(())` if and only if `signature` is valid for `digest`
    fn verify_digest(&self, digest: &Digest32, signature: &SignatureBytes) -> Result<()>;
}

impl<T: DigestSigner + ?Sized> DigestSigner for &T {
    fn sign_digest(&self, digest: &Digest32) -> Result<SignatureBytes> {
        (**self).sign_digest(digest)
    }
}

/// Sign `digest` into a caller-allocated buffer
///
/// Both buffers are length-checked before the signer runs. On any failure
/// `signature_out` is left untouched, so a caller can never mistake a stale
/// or partial buffer for a signature.
pub fn sign_into<S: DigestSigner + ?Sized>(
    signer: &S,
    signature_out: &mut [u8],
    digest: &[u8],
) -> Result<()> {
    if signature_out.len() != ECDSA_P256_SIGNATURE_SIZE {
        return Err(Error::InvalidLength {
            context: "sign_into signature buffer",
            expected: ECDSA_P256_SIGNATURE_SIZE,
            actual: signature_out.len(),
        });
    }
    if digest.len() != ECDSA_P256_DIGEST_SIZE {
        return Err(Error::InvalidLength {
            context: "sign_into digest",
            expected: ECDSA_P256_DIGEST_SIZE,
            actual: digest.len(),
        });
    }

    let digest = Digest32::from_slice(digest)?;
    let signature = signer.sign_digest(&digest)?;
    signature_out.copy_from_slice(signature.as_bytes());
    Ok(())
}
