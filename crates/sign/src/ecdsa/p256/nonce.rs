//! Ephemeral scalar (`k`) generation for ECDSA P-256
//!
//! Three sources are provided:
//! - [`Rfc6979Nonce`]: deterministic HMAC-SHA-256 DRBG per RFC 6979 §3.2
//! - [`Rfc6979Nonce::hedged`]: the same DRBG with 32 bytes of fresh entropy
//!   mixed into the seed (RFC 6979 §3.6)
//! - [`RandomNonce`]: rejection sampling from a caller-provided RNG
//!
//! Every call to [`NonceSource::next_nonce`] yields a fresh candidate in
//! [1, n − 1]; the signer calls it again whenever r or s turns out zero.

use ecsig_algorithms::ec::p256::{Scalar, P256_SCALAR_SIZE};
use ecsig_api::{Digest32, Error as ApiError, Result as ApiResult};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// A stream of candidate ECDSA nonces
pub trait NonceSource {
    /// Next nonce k in [1, n − 1]
    fn next_nonce(&mut self) -> ApiResult<Scalar>;
}

impl<T: NonceSource + ?Sized> NonceSource for &mut T {
    fn next_nonce(&mut self) -> ApiResult<Scalar> {
        (**self).next_nonce()
    }
}

/// RFC 6979 HMAC_DRBG state (K, V) seeded from the key and digest
///
/// Repeated calls continue the generator, so the n-th call returns the
/// n-th valid candidate the RFC would produce.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Rfc6979Nonce {
    k: [u8; 32],
    v: [u8; 32],
}

impl Rfc6979Nonce {
    /// Deterministic nonce source for `secret` signing `digest`
    pub fn new(secret: &Scalar, digest: &Digest32) -> ApiResult<Self> {
        Self::seeded(secret, digest, &[])
    }

    /// Deterministic source with 32 bytes of extra entropy from `rng`
    ///
    /// A failing RNG is reported as `EntropyUnavailable`, never papered over
    /// with a fallback.
    pub fn hedged<R: CryptoRng + RngCore>(
        secret: &Scalar,
        digest: &Digest32,
        rng: &mut R,
    ) -> ApiResult<Self> {
        let mut extra = [0u8; 32];
        rng.try_fill_bytes(&mut extra)
            .map_err(ApiError::from)
            .map_err(|e| e.with_context("RFC 6979 hedged nonce"))?;
        let source = Self::seeded(secret, digest, &extra);
        extra.zeroize();
        source
    }

    /// Steps 3.2.b through 3.2.g
    fn seeded(secret: &Scalar, digest: &Digest32, extra: &[u8]) -> ApiResult<Self> {
        let mut x = secret.to_bytes(); // int2octets(x)
        let h1 = Scalar::from_bytes_reduced(digest.as_bytes()).to_bytes(); // bits2octets(h1)

        let mut state = Rfc6979Nonce {
            k: [0x00; 32],
            v: [0x01; 32],
        };
        for round in [0x00u8, 0x01] {
            state.k = hmac(&state.k, &[&state.v, &[round], &x, &h1, extra])?;
            state.v = hmac(&state.k, &[&state.v])?;
        }
        x.zeroize();
        Ok(state)
    }

    /// Step 3.2.h: K = HMAC_K(V ‖ 0x00), V = HMAC_K(V)
    fn advance(&mut self) -> ApiResult<()> {
        self.k = hmac(&self.k, &[&self.v, &[0x00]])?;
        self.v = hmac(&self.k, &[&self.v])?;
        Ok(())
    }
}

impl NonceSource for Rfc6979Nonce {
    fn next_nonce(&mut self) -> ApiResult<Scalar> {
        loop {
            // qlen = hlen = 256, so a single block is one candidate
            self.v = hmac(&self.k, &[&self.v])?;
            let candidate = Scalar::new_nonzero(&self.v);
            self.advance()?;
            if let Ok(k) = candidate {
                return Ok(k);
            }
        }
    }
}

/// Uniform nonces drawn from a cryptographic RNG
///
/// A source that keeps producing out-of-range values is reported as
/// `EntropyUnavailable` after a bounded number of resamples.
pub struct RandomNonce<'a, R: CryptoRng + RngCore> {
    rng: &'a mut R,
}

impl<'a, R: CryptoRng + RngCore> RandomNonce<'a, R> {
    /// Borrow `rng` for the lifetime of the source
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: CryptoRng + RngCore> NonceSource for RandomNonce<'_, R> {
    fn next_nonce(&mut self) -> ApiResult<Scalar> {
        Scalar::random_nonzero(&mut *self.rng)
            .map_err(ApiError::from)
            .map_err(|e| e.with_context("random nonce"))
    }
}

/// HMAC-SHA-256 over the concatenation of `parts`
fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> ApiResult<[u8; P256_SCALAR_SIZE]> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| ApiError::InvalidParameter {
        context: "RFC 6979 HMAC",
        message: "key rejected".to_string(),
    })?;
    for part in parts {
        mac.update(part);
    }
    let mut out = [0u8; P256_SCALAR_SIZE];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}
