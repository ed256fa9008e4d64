//! P-256 scalar arithmetic operations

use crate::ec::p256::constants::{
    adc8, be_bytes_to_limbs, limbs_to_be_bytes, mul_wide, sbb8, NLIMBS, P256_SCALAR_SIZE,
};
use crate::error::{validate, Error, Result};
use core::fmt;
use ecsig_params::traditional::ecdsa::NIST_P256;
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// P-256 scalar value for use in elliptic curve operations
///
/// Represents integers modulo the curve order n, canonical in [0, n).
/// Zero is representable because intermediate arithmetic needs it; the
/// constructors that feed keys and nonces (`new_nonzero`, `random_nonzero`)
/// reject it. Automatically zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Scalar([u32; NLIMBS]);

impl Scalar {
    /// n in little-endian limbs
    pub(crate) const N_LIMBS: [u32; NLIMBS] = be_bytes_to_limbs(&NIST_P256.n);

    /// 2²⁵⁶ − n, used to fold the high half of a product: 2²⁵⁶ ≡ 2²⁵⁶ − n (mod n)
    const FOLD_LIMBS: [u32; NLIMBS] = {
        let (r, _) = Self::neg_n();
        r
    };

    /// Consecutive out-of-range draws tolerated by [`Self::random_nonzero`]
    pub const MAX_RESAMPLES: usize = 64;

    /// n − 2, the Fermat inversion exponent (big-endian)
    const N_MINUS_2: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xBC, 0xE6, 0xFA, 0xAD, 0xA7, 0x17, 0x9E, 0x84, 0xF3, 0xB9, 0xCA, 0xC2, 0xFC, 0x63,
        0x25, 0x4F,
    ];

    /// The additive identity
    pub fn zero() -> Self {
        Scalar([0u32; NLIMBS])
    }

    /// The multiplicative identity
    pub fn one() -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = 1;
        Scalar(limbs)
    }

    /// Parse a canonical big-endian scalar; values ≥ n are rejected
    pub fn from_bytes(bytes: &[u8; P256_SCALAR_SIZE]) -> Result<Self> {
        let limbs = be_bytes_to_limbs(bytes);
        let (_, borrow) = sbb8(&limbs, &Self::N_LIMBS);
        if borrow == 0 {
            return Err(Error::scalar("P-256 Scalar", "value ≥ curve order"));
        }
        Ok(Scalar(limbs))
    }

    /// Interpret 32 big-endian bytes as an integer and reduce it mod n
    ///
    /// This is how digests and x-coordinates become scalars. Any 256-bit
    /// value is < 2n, so one conditional subtraction suffices.
    pub fn from_bytes_reduced(bytes: &[u8; P256_SCALAR_SIZE]) -> Self {
        let limbs = be_bytes_to_limbs(bytes);
        let (reduced, borrow) = sbb8(&limbs, &Self::N_LIMBS);
        Self::select(&reduced, &limbs, Choice::from(borrow as u8))
    }

    /// Parse a scalar that must lie in [1, n − 1]
    ///
    /// Used for private keys and externally supplied signature components.
    pub fn new_nonzero(bytes: &[u8; P256_SCALAR_SIZE]) -> Result<Self> {
        let scalar = Self::from_bytes(bytes)?;
        if scalar.is_zero() {
            return Err(Error::scalar("P-256 Scalar", "scalar cannot be zero"));
        }
        Ok(scalar)
    }

    /// Deserialize a scalar from a slice, validating length and range [1, n − 1]
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        validate::length("P-256 Scalar", bytes.len(), P256_SCALAR_SIZE)?;

        let mut scalar_bytes = [0u8; P256_SCALAR_SIZE];
        scalar_bytes.copy_from_slice(bytes);
        let result = Self::new_nonzero(&scalar_bytes);
        scalar_bytes.zeroize();
        result
    }

    /// Draw a uniform scalar in [1, n − 1] by rejection sampling
    ///
    /// A healthy source is rejected with probability about 2⁻³², so after
    /// [`Self::MAX_RESAMPLES`] consecutive rejections the source is treated
    /// as broken. RNG failures and a stuck source both give `Error::Entropy`.
    pub fn random_nonzero<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; P256_SCALAR_SIZE];
        for _ in 0..Self::MAX_RESAMPLES {
            if let Err(e) = rng.try_fill_bytes(&mut bytes) {
                bytes.zeroize();
                return Err(Error::entropy("P-256 Scalar", e.to_string()));
            }
            if let Ok(scalar) = Self::new_nonzero(&bytes) {
                bytes.zeroize();
                return Ok(scalar);
            }
        }
        bytes.zeroize();
        Err(Error::entropy(
            "P-256 Scalar",
            "random source produced no value in [1, n - 1]",
        ))
    }

    /// Serialize the scalar to big-endian bytes
    pub fn to_bytes(&self) -> [u8; P256_SCALAR_SIZE] {
        limbs_to_be_bytes(&self.0)
    }

    /// Constant-time check for the additive identity
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&[0u32; NLIMBS]).into()
    }

    /// 4-bit window starting at bit `4 * i`
    #[inline(always)]
    pub(crate) fn nibble(&self, i: usize) -> u8 {
        ((self.0[i / 8] >> ((i % 8) * 4)) & 0xF) as u8
    }

    /// (self + other) mod n
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = adc8(&self.0, &other.0);
        let (reduced, borrow) = sbb8(&sum, &Self::N_LIMBS);
        let need_reduce = (carry | (borrow ^ 1)) & 1;
        Self::select(&sum, &reduced, Choice::from(need_reduce as u8))
    }

    /// (self − other) mod n
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = sbb8(&self.0, &other.0);
        let (diff_plus_n, _) = adc8(&diff, &Self::N_LIMBS);
        Self::select(&diff, &diff_plus_n, Choice::from(borrow as u8))
    }

    /// (self · other) mod n
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(mul_wide(&self.0, &other.0))
    }

    /// self² mod n
    #[inline(always)]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// −self mod n (zero stays zero)
    pub fn negate(&self) -> Self {
        Self::zero().sub(self)
    }

    /// Multiplicative inverse modulo n using Fermat's little theorem
    /// a⁻¹ ≡ a^(n−2) (mod n). Left-to-right binary exponentiation over the
    /// public exponent.
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidInverse {
                context: "P-256 Scalar",
            });
        }

        let mut result = Self::one();
        for byte in Self::N_MINUS_2 {
            for bit in (0..8).rev() {
                result = result.square();
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        Ok(result)
    }

    // Private helper methods

    fn select(a: &[u32; NLIMBS], b: &[u32; NLIMBS], flag: Choice) -> Self {
        let mut out = [0u32; NLIMBS];
        for ((a_limb, b_limb), out_limb) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
            *out_limb = u32::conditional_select(a_limb, b_limb, flag);
        }
        Scalar(out)
    }

    /// 2²⁵⁶ − n as a const computation over the limbs of n
    const fn neg_n() -> ([u32; NLIMBS], u32) {
        let mut r = [0u32; NLIMBS];
        let mut borrow = 0u64;
        let mut i = 0;
        while i < NLIMBS {
            let tmp = 0u64
                .wrapping_sub(Self::N_LIMBS[i] as u64)
                .wrapping_sub(borrow);
            r[i] = tmp as u32;
            borrow = (tmp >> 63) & 1;
            i += 1;
        }
        (r, borrow as u32)
    }

    /// Reduce a 512-bit product modulo n
    ///
    /// Repeatedly replaces hi·2²⁵⁶ + lo with hi·(2²⁵⁶ − n) + lo. Since
    /// 2²⁵⁶ − n < 2²²⁴ every pass shrinks the value by at least 32 bits,
    /// so the high half empties after a handful of passes; a final
    /// conditional subtraction brings the result below n.
    fn reduce_wide(mut t: [u32; 2 * NLIMBS]) -> Self {
        while t[NLIMBS..].iter().any(|&w| w != 0) {
            let mut acc = [0u128; 2 * NLIMBS];
            for (a, &lo) in acc.iter_mut().zip(t[..NLIMBS].iter()) {
                *a = lo as u128;
            }
            for (i, &hi) in t[NLIMBS..].iter().enumerate() {
                for (j, &f) in Self::FOLD_LIMBS.iter().enumerate() {
                    acc[i + j] += (hi as u128) * (f as u128);
                }
            }

            let mut carry: u128 = 0;
            for (w, &a) in t.iter_mut().zip(acc.iter()) {
                let v = a + carry;
                *w = v as u32;
                carry = v >> 32;
            }
        }

        let mut lo = [0u32; NLIMBS];
        lo.copy_from_slice(&t[..NLIMBS]);
        let (reduced, borrow) = sbb8(&lo, &Self::N_LIMBS);
        let result = Self::select(&reduced, &lo, Choice::from(borrow as u8));
        lo.zeroize();
        t.zeroize();
        result
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Scalar {}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar([REDACTED])")
    }
}
