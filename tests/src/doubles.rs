//! Test doubles for the signer and entropy boundaries

use ecsig::algorithms::p256::{scalar_mult_base_g, Scalar};
use ecsig::api::{Digest32, DigestSigner, Error, Result, SignatureBytes};
use ecsig::sign::{NonceSource, Rfc6979Nonce};
use rand::{CryptoRng, RngCore};
use std::cell::Cell;

/// Signer that returns a canned signature and counts calls
pub struct MockSigner {
    signature: SignatureBytes,
    calls: Cell<u32>,
}

impl MockSigner {
    /// Always answer with `signature`
    pub fn new(signature: [u8; 64]) -> Self {
        Self {
            signature: SignatureBytes::new(signature),
            calls: Cell::new(0),
        }
    }

    /// Number of `sign_digest` calls so far
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl DigestSigner for MockSigner {
    fn sign_digest(&self, _digest: &Digest32) -> Result<SignatureBytes> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.signature)
    }
}

/// Signer that always fails with a clone of the configured error
pub struct FailingSigner(pub Error);

impl DigestSigner for FailingSigner {
    fn sign_digest(&self, _digest: &Digest32) -> Result<SignatureBytes> {
        Err(self.0.clone())
    }
}

/// An entropy source that is permanently unavailable
pub struct DeadRng;

impl RngCore for DeadRng {
    fn next_u32(&mut self) -> u32 {
        unimplemented!("DeadRng only supports try_fill_bytes")
    }

    fn next_u64(&mut self) -> u64 {
        unimplemented!("DeadRng only supports try_fill_bytes")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        unimplemented!("DeadRng only supports try_fill_bytes")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        Err(rand::Error::new("entropy source offline"))
    }
}

impl CryptoRng for DeadRng {}

/// An entropy source stuck on one byte value
pub struct StuckRng(pub u8);

impl RngCore for StuckRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_ne_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_ne_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
        dest.fill(self.0);
        Ok(())
    }
}

impl CryptoRng for StuckRng {}

/// RFC 6979 signer whose nonce is knocked off by a fixed offset after
/// derivation, as a glitch on k would do
///
/// The released r is computed from the faulty nonce and no self check runs.
pub struct GlitchedSigner {
    secret: Scalar,
    offset: Scalar,
}

impl GlitchedSigner {
    /// Sign with `secret`, adding `offset` to every derived nonce
    pub fn new(secret: &[u8; 32], offset: &[u8; 32]) -> Result<Self> {
        Ok(Self {
            secret: Scalar::new_nonzero(secret)?,
            offset: Scalar::new_nonzero(offset)?,
        })
    }
}

impl DigestSigner for GlitchedSigner {
    fn sign_digest(&self, digest: &Digest32) -> Result<SignatureBytes> {
        let k = Rfc6979Nonce::new(&self.secret, digest)?
            .next_nonce()?
            .add(&self.offset);
        let r = Scalar::from_bytes_reduced(&scalar_mult_base_g(&k)?.x_coordinate_bytes());
        let e = Scalar::from_bytes_reduced(digest.as_bytes());
        let s = k.invert()?.mul(&e.add(&r.mul(&self.secret)));
        Ok(SignatureBytes::from_components(&r.to_bytes(), &s.to_bytes()))
    }
}
