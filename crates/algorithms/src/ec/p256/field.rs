//! P-256 field arithmetic implementation

use crate::ec::p256::constants::{
    adc8, be_bytes_to_limbs, limbs_to_be_bytes, mul_wide, sbb8, NLIMBS, P256_FIELD_ELEMENT_SIZE,
};
use crate::error::{Error, Result};
use ecsig_params::traditional::ecdsa::NIST_P256;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// P-256 field element representing values in 𝔽ₚ, where
/// p = 2²⁵⁶ − 2²²⁴ + 2¹⁹² + 2⁹⁶ − 1.
/// Internally stored as 8 little‐endian 32‐bit limbs, always fully reduced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldElement(pub(crate) [u32; NLIMBS]);

impl FieldElement {
    /* ---------------------------------------------------------------- */
    /*  NIST P-256 Field Constants (little‐endian 32‐bit limbs)         */
    /* ---------------------------------------------------------------- */

    /// p = 0xFFFFFFFF 00000001 00000000 00000000 00000000 FFFFFFFF FFFFFFFF FFFFFFFF
    pub(crate) const MOD_LIMBS: [u32; NLIMBS] = be_bytes_to_limbs(&NIST_P256.p);

    /// a = −3 mod p = p − 3
    pub(crate) const A_M3: [u32; NLIMBS] = be_bytes_to_limbs(&NIST_P256.a);

    /// Curve coefficient b
    pub(crate) const B: FieldElement = FieldElement(be_bytes_to_limbs(&NIST_P256.b));

    /// p − 2, the Fermat inversion exponent (big-endian)
    const P_MINUS_2: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFF, 0xFD,
    ];

    /// (p + 1) / 4 = 2²⁵⁴ − 2²²² + 2¹⁹⁰ + 2⁹⁴ (big-endian)
    const SQRT_EXP: [u8; 32] = [
        0x3F, 0xFF, 0xFF, 0xFF, 0xC0, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00,
    ];

    /* ================================================================= */
    /*  Tiny helpers                                                     */
    /* ================================================================= */

    /// Build a field element from a small literal (`0 ≤ n < 2³²`)
    #[inline]
    pub fn from_u32(n: u32) -> Self {
        let mut limbs = [0u32; NLIMBS];
        limbs[0] = n;
        FieldElement(limbs)
    }

    /// The additive identity: 0
    #[inline]
    pub fn zero() -> Self {
        FieldElement([0u32; NLIMBS])
    }

    /// The multiplicative identity: 1
    #[inline]
    pub fn one() -> Self {
        Self::from_u32(1)
    }

    /// The curve coefficient a = −3
    #[inline]
    pub fn a() -> Self {
        FieldElement(Self::A_M3)
    }

    /// The curve coefficient b
    #[inline]
    pub fn b() -> Self {
        Self::B
    }

    /// Create a field element from big‐endian bytes.
    /// Only canonical encodings (value < p) are accepted.
    pub fn from_bytes(bytes: &[u8; P256_FIELD_ELEMENT_SIZE]) -> Result<Self> {
        let limbs = be_bytes_to_limbs(bytes);
        let (_, borrow) = sbb8(&limbs, &Self::MOD_LIMBS);
        if borrow == 0 {
            return Err(Error::param("FieldElement P-256", "Value ≥ modulus"));
        }
        Ok(FieldElement(limbs))
    }

    /// Convert this field element into big‐endian bytes.
    pub fn to_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        limbs_to_be_bytes(&self.0)
    }

    /// Is self < p ?
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        let (_, borrow) = sbb8(&self.0, &Self::MOD_LIMBS);
        borrow == 1
    }

    /// Constant-time zero check
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&[0u32; NLIMBS]).into()
    }

    /// Return true if the element is odd (least‐significant bit = 1).
    pub fn is_odd(&self) -> bool {
        (self.0[0] & 1) == 1
    }

    /// Constant‐time addition: (self + other) mod p
    pub fn add(&self, other: &Self) -> Self {
        let (sum, carry) = adc8(&self.0, &other.0);

        // If carry = 1 or sum ≥ p, subtract p
        let (reduced, borrow) = sbb8(&sum, &Self::MOD_LIMBS);
        let need_reduce = (carry | (borrow ^ 1)) & 1;

        Self::select_limbs(&sum, &reduced, Choice::from(need_reduce as u8))
    }

    /// Constant‐time subtraction: (self − other) mod p
    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrow) = sbb8(&self.0, &other.0);
        // If borrow == 1, add p back
        let (diff_plus_p, _) = adc8(&diff, &Self::MOD_LIMBS);
        Self::select_limbs(&diff, &diff_plus_p, Choice::from(borrow as u8))
    }

    /// Field multiplication: (self · other) mod p
    pub fn mul(&self, other: &Self) -> Self {
        Self::reduce_wide(mul_wide(&self.0, &other.0))
    }

    /// Field squaring: self² mod p
    #[inline(always)]
    pub fn square(&self) -> Self {
        self.mul(self)
    }

    /// Doubling: 2·self mod p
    #[inline(always)]
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Multiplicative inverse via Fermat: a^(p−2) mod p
    pub fn invert(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(Error::InvalidInverse {
                context: "FieldElement P-256",
            });
        }
        Ok(self.pow_be(&Self::P_MINUS_2))
    }

    /// Negate this field element: p − self, or zero for zero
    pub fn negate(&self) -> Self {
        FieldElement::zero().sub(self)
    }

    /// Square root using p ≡ 3 (mod 4): sqrt(x) = x^((p+1)/4)
    ///
    /// Returns `None` for quadratic non-residues.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow_be(&Self::SQRT_EXP);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }

    /// Constant-time select: `a` if `choice` is 0, `b` if it is 1
    pub fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::select_limbs(&a.0, &b.0, choice)
    }

    /* ================================================================= */
    /*  Private helper methods                                           */
    /* ================================================================= */

    /// Left-to-right square-and-multiply with a public exponent
    fn pow_be(&self, exp: &[u8; 32]) -> Self {
        let mut result = FieldElement::one();
        for &byte in exp.iter() {
            for bit in (0..8).rev() {
                result = result.square();
                if (byte >> bit) & 1 == 1 {
                    result = result.mul(self);
                }
            }
        }
        result
    }

    fn select_limbs(a: &[u32; NLIMBS], b: &[u32; NLIMBS], flag: Choice) -> Self {
        let mut out = [0u32; NLIMBS];
        for ((a_limb, b_limb), out_limb) in a.iter().zip(b.iter()).zip(out.iter_mut()) {
            *out_limb = u32::conditional_select(a_limb, b_limb, flag);
        }
        FieldElement(out)
    }

    /// Reduce a 16-word (512-bit) value modulo p.
    ///
    /// Algorithm: FIPS 186-4 D.2.3 fast reduction,
    /// r = s1 + 2·s2 + 2·s3 + s4 + s5 − s6 − s7 − s8 − s9,
    /// evaluated column by column in signed 64-bit accumulators, then the
    /// overflow word is folded back with 2²⁵⁶ ≡ 2²²⁴ − 2¹⁹² − 2⁹⁶ + 1.
    fn reduce_wide(t: [u32; 2 * NLIMBS]) -> FieldElement {
        let c: [i64; 2 * NLIMBS] = t.map(|w| w as i64);

        //------------------------------------------------------------------
        // step 1  –  per-column sums of the nine Solinas terms
        //------------------------------------------------------------------
        let mut acc = [
            c[0] + c[8] + c[9] - c[11] - c[12] - c[13] - c[14],
            c[1] + c[9] + c[10] - c[12] - c[13] - c[14] - c[15],
            c[2] + c[10] + c[11] - c[13] - c[14] - c[15],
            c[3] + 2 * c[11] + 2 * c[12] + c[13] - c[15] - c[8] - c[9],
            c[4] + 2 * c[12] + 2 * c[13] + c[14] - c[9] - c[10],
            c[5] + 2 * c[13] + 2 * c[14] + c[15] - c[10] - c[11],
            c[6] + 3 * c[14] + 2 * c[15] + c[13] - c[8] - c[9],
            c[7] + 3 * c[15] + c[8] - c[10] - c[11] - c[12] - c[13],
        ];

        //------------------------------------------------------------------
        // step 2  –  signed carry propagation, folding the top word
        //            until it vanishes
        //------------------------------------------------------------------
        let mut top = Self::propagate(&mut acc);
        while top != 0 {
            acc[0] += top;
            acc[3] -= top;
            acc[6] -= top;
            acc[7] += top;
            top = Self::propagate(&mut acc);
        }

        //------------------------------------------------------------------
        // step 3  –  value < 2²⁵⁶ < 2p: one conditional subtraction
        //------------------------------------------------------------------
        let mut out = [0u32; NLIMBS];
        for (o, &a) in out.iter_mut().zip(acc.iter()) {
            *o = a as u32;
        }
        let (sub, borrow) = sbb8(&out, &Self::MOD_LIMBS);
        Self::select_limbs(&out, &sub, Choice::from((borrow ^ 1) as u8))
    }

    /// Normalise every column to [0, 2³²) and return the signed overflow
    #[inline(always)]
    fn propagate(acc: &mut [i64; NLIMBS]) -> i64 {
        let mut carry = 0i64;
        for a in acc.iter_mut() {
            let v = *a + carry;
            *a = v & 0xFFFF_FFFF;
            carry = v >> 32;
        }
        carry
    }
}
