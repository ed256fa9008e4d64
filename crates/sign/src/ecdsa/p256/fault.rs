//! Private key recovery from faulty ECDSA-P256 signatures
//!
//! A fault injected while signing makes the released (r, s) satisfy a
//! different equation than k·s = e + r·d. Paired with the correct signature
//! computed with the same nonce, that equation is linear in d for each fault
//! location in [`FaultModel`], so d falls out of one modular division.
//! Candidates are only accepted when they reproduce the public key.
//!
//! The paired models need the signer to reuse k for a repeated digest;
//! [`is_deterministic`] checks that from the outside.

use super::{EcdsaP256PublicKey, EcdsaP256SecretKey};
use core::fmt;
use ecsig_algorithms::ec::p256 as ec;
use ecsig_api::{Digest32, DigestSigner, Result as ApiResult, SignatureBytes};
use tracing::debug;

/// Repeat signatures requested by [`is_deterministic`] callers by default
pub const DETERMINISM_ROUNDS: usize = 5;

/// A released signature together with its digest, reduced mod n
///
/// Faulty components can fall outside [1, n − 1], so nothing is range
/// checked here.
#[derive(Clone, PartialEq, Eq)]
pub struct ObservedSignature {
    e: ec::Scalar,
    r: ec::Scalar,
    s: ec::Scalar,
}

impl ObservedSignature {
    /// Reduce a digest and a 64-byte `r ‖ s` signature
    pub fn new(digest: &Digest32, signature: &SignatureBytes) -> Self {
        Self {
            e: ec::Scalar::from_bytes_reduced(digest.as_bytes()),
            r: ec::Scalar::from_bytes_reduced(&signature.r()),
            s: ec::Scalar::from_bytes_reduced(&signature.s()),
        }
    }

    /// Build from already reduced digest and components
    pub fn from_scalars(e: ec::Scalar, r: ec::Scalar, s: ec::Scalar) -> Self {
        Self { e, r, s }
    }
}

impl fmt::Debug for ObservedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedSignature")
            .field("e", &hex::encode(self.e.to_bytes()))
            .field("r", &hex::encode(self.r.to_bytes()))
            .field("s", &hex::encode(self.s.to_bytes()))
            .finish()
    }
}

/// A correct and a faulty signature over the same digest with the same k
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaultPair {
    /// Signature from an undisturbed run
    pub correct: ObservedSignature,
    /// Signature released by the faulted run
    pub faulty: ObservedSignature,
}

impl FaultPair {
    /// Pair two signatures over `digest`
    pub fn new(digest: &Digest32, correct: &SignatureBytes, faulty: &SignatureBytes) -> Self {
        Self {
            correct: ObservedSignature::new(digest, correct),
            faulty: ObservedSignature::new(digest, faulty),
        }
    }

    fn same_digest(&self) -> bool {
        self.correct.e == self.faulty.e
    }
}

/// Where the fault hit the signing computation
///
/// Value faults replace an intermediate with an unknown value; for the
/// two-pair models the same unknown value must hit both runs. Differential
/// faults add the same unknown offset in both runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultModel {
    /// Uncontrolled fault on r, faulty r released (one pair)
    FaultyR,
    /// Value fault on r or on r·d, correct r released
    ValueR,
    /// Value fault on the secret key d
    ValueKey,
    /// Value fault on the digest
    ValueDigest,
    /// Value fault on r·d + e
    ValueRdPlusDigest,
    /// Value fault on k or k⁻¹; uses only the two faulty signatures, which
    /// must be over distinct digests
    ValueNonce,
    /// Differential fault on r, r·d, e or r·d + e
    DifferentialSum,
    /// Differential fault on k, faulty r released
    DifferentialNonce,
    /// Differential fault on k⁻¹
    DifferentialNonceInverse,
}

impl FaultModel {
    /// Every model, single-pair first
    pub const ALL: [FaultModel; 9] = [
        FaultModel::FaultyR,
        FaultModel::ValueR,
        FaultModel::ValueKey,
        FaultModel::ValueDigest,
        FaultModel::ValueRdPlusDigest,
        FaultModel::ValueNonce,
        FaultModel::DifferentialSum,
        FaultModel::DifferentialNonce,
        FaultModel::DifferentialNonceInverse,
    ];

    /// Short label used in the fault attack literature
    pub fn name(self) -> &'static str {
        match self {
            Self::FaultyR => "F",
            Self::ValueR => "FC1",
            Self::ValueKey => "FC2",
            Self::ValueDigest => "FC3",
            Self::ValueRdPlusDigest => "FC4",
            Self::ValueNonce => "FC5",
            Self::DifferentialSum => "FDC1",
            Self::DifferentialNonce => "FDC2",
            Self::DifferentialNonceInverse => "FDC3",
        }
    }

    /// Number of signature pairs the model consumes
    pub fn pairs_needed(self) -> usize {
        match self {
            Self::FaultyR => 1,
            _ => 2,
        }
    }

    /// Solve for d under this model
    ///
    /// Only the first [`Self::pairs_needed`] pairs are used. Returns `None`
    /// when there are too few pairs, a pair mixes digests, or the system is
    /// singular. A returned candidate is not yet checked against any key.
    pub fn candidate(self, pairs: &[FaultPair]) -> Option<ec::Scalar> {
        let needed = self.pairs_needed();
        if pairs.len() < needed {
            return None;
        }
        let pairs = &pairs[..needed];
        if self != Self::ValueNonce && !pairs.iter().all(FaultPair::same_digest) {
            return None;
        }

        let (num, den) = match self {
            Self::FaultyR => {
                let (g, b) = (&pairs[0].correct, &pairs[0].faulty);
                // e(s' − s) / (s·r' − r·s')
                (
                    g.e.mul(&b.s.sub(&g.s)),
                    g.s.mul(&b.r).sub(&g.r.mul(&b.s)),
                )
            }
            Self::ValueNonce => {
                let (b1, b2) = (&pairs[0].faulty, &pairs[1].faulty);
                if b1.e == b2.e {
                    return None;
                }
                (
                    b2.e.mul(&b1.s).sub(&b1.e.mul(&b2.s)),
                    b2.s.mul(&b1.r).sub(&b2.r.mul(&b1.s)),
                )
            }
            _ => self.two_pair_terms(&pairs[0], &pairs[1]),
        };

        let d = num.mul(&den.invert().ok()?);
        (!d.is_zero()).then_some(d)
    }

    fn two_pair_terms(self, p1: &FaultPair, p2: &FaultPair) -> (ec::Scalar, ec::Scalar) {
        let (g1, b1) = (&p1.correct, &p1.faulty);
        let (g2, b2) = (&p2.correct, &p2.faulty);
        let (h1, h2) = (&g1.e, &g2.e);

        // Shared by several models: s₂·s'₁·r₁ − s₁·s'₂·r₂
        let cross_r = g2.s.mul(&b1.s).mul(&g1.r).sub(&g1.s.mul(&b2.s).mul(&g2.r));
        // s₁·s'₂·h₂ − s₂·s'₁·h₁
        let cross_h = g1.s.mul(&b2.s).mul(h2).sub(&g2.s.mul(&b1.s).mul(h1));

        match self {
            Self::ValueR => (
                g1.s.mul(h2)
                    .mul(&b2.s.sub(&g2.s))
                    .sub(&g2.s.mul(h1).mul(&b1.s.sub(&g1.s))),
                cross_r,
            ),
            Self::ValueKey => (
                g1.s.mul(&b1.r)
                    .mul(h2)
                    .mul(&b2.s.sub(&g2.s))
                    .sub(&g2.s.mul(&b2.r).mul(h1).mul(&b1.s.sub(&g1.s))),
                g2.s.mul(&b2.r)
                    .mul(&b1.s)
                    .mul(&g1.r)
                    .sub(&g1.s.mul(&b1.r).mul(&b2.s).mul(&g2.r)),
            ),
            Self::ValueDigest => (
                cross_h,
                g1.s.mul(&g2.s).mul(&b2.r.sub(&b1.r)).add(&cross_r),
            ),
            Self::ValueRdPlusDigest => (cross_h, cross_r),
            Self::DifferentialSum => (
                g1.s.mul(&g2.s).mul(&h1.sub(h2)).add(&cross_h),
                cross_r.add(&g1.s.mul(&g2.s).mul(&b2.r.sub(&b1.r))),
            ),
            Self::DifferentialNonce => (
                h2.mul(&g1.s)
                    .mul(&b1.s)
                    .mul(&g2.s.sub(&b2.s))
                    .sub(&h1.mul(&g2.s).mul(&b2.s).mul(&g1.s.sub(&b1.s))),
                g2.s.mul(&b2.s)
                    .mul(&b1.r.mul(&g1.s).sub(&g1.r.mul(&b1.s)))
                    .sub(&g1.s.mul(&b1.s).mul(&b2.r.mul(&g2.s).sub(&g2.r.mul(&b2.s)))),
            ),
            Self::DifferentialNonceInverse => (
                h2.mul(&g1.s.sub(&b1.s)).sub(&h1.mul(&g2.s.sub(&b2.s))),
                g1.r.mul(&g2.s.sub(&b2.s)).sub(&g2.r.mul(&g1.s.sub(&b1.s))),
            ),
            // Single-pair and faulty-only models are solved in `candidate`
            Self::FaultyR | Self::ValueNonce => (ec::Scalar::zero(), ec::Scalar::zero()),
        }
    }
}

impl fmt::Display for FaultModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Try `models` against `pairs` and return the first key matching `public_key`
///
/// Single-pair models are tried on every pair, two-pair models on every
/// combination of two pairs.
pub fn recover_key(
    public_key: &EcdsaP256PublicKey,
    pairs: &[FaultPair],
    models: &[FaultModel],
) -> Option<(FaultModel, EcdsaP256SecretKey)> {
    for &model in models {
        let found = match model.pairs_needed() {
            1 => pairs
                .iter()
                .find_map(|p| matching_key(model, core::slice::from_ref(p), public_key)),
            _ => (0..pairs.len()).find_map(|i| {
                (i + 1..pairs.len()).find_map(|j| {
                    let group = [pairs[i].clone(), pairs[j].clone()];
                    matching_key(model, &group, public_key)
                })
            }),
        };
        if let Some(key) = found {
            debug!(model = model.name(), "fault model reproduced the public key");
            return Some((model, key));
        }
    }
    None
}

fn matching_key(
    model: FaultModel,
    pairs: &[FaultPair],
    public_key: &EcdsaP256PublicKey,
) -> Option<EcdsaP256SecretKey> {
    let key = EcdsaP256SecretKey::from_scalar(model.candidate(pairs)?);
    (key.public_key().ok().as_ref() == Some(public_key)).then_some(key)
}

/// Whether `signer` returns the same signature for a repeated digest
///
/// Signs `digest` once, then `rounds` more times, and compares every
/// result to the first. Signer errors propagate.
pub fn is_deterministic<S: DigestSigner + ?Sized>(
    signer: &S,
    digest: &Digest32,
    rounds: usize,
) -> ApiResult<bool> {
    let baseline = signer.sign_digest(digest)?;
    for _ in 0..rounds {
        if signer.sign_digest(digest)? != baseline {
            return Ok(false);
        }
    }
    Ok(true)
}
