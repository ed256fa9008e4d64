//! NIST P-256 Elliptic Curve Primitives
//!
//! The curve equation is y² = x³ − 3x + b over the prime field 𝔽ₚ where:
//! - p = 2²⁵⁶ − 2²²⁴ + 2¹⁹² + 2⁹⁶ − 1 (NIST P-256 prime)
//! - the group order n = 0xFFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551
//!
//! The implementation uses:
//! - NIST fast reduction for field multiplication
//! - folding by 2²⁵⁶ − n for scalar multiplication
//! - Jacobian projective coordinates for point operations
//! - fixed 4-bit window scalar multiplication with constant-time table scans

mod constants;
mod field;
mod point;
mod scalar;

pub use constants::{
    P256_FIELD_ELEMENT_SIZE, P256_POINT_COMPRESSED_SIZE, P256_POINT_UNCOMPRESSED_SIZE,
    P256_SCALAR_SIZE,
};
pub use field::FieldElement;
pub use point::{Point, PointFormat};
pub use scalar::Scalar;

use crate::error::{Error, Result};
use constants::be_bytes_to_limbs;
use ecsig_params::traditional::ecdsa::NIST_P256;
use rand::{CryptoRng, RngCore};

/// Get the standard base point G of the P-256 curve
///
/// Built directly from the published coordinates, which lie on the curve.
pub fn base_point_g() -> Point {
    Point::from_affine_unchecked(
        FieldElement(be_bytes_to_limbs(&NIST_P256.g_x)),
        FieldElement(be_bytes_to_limbs(&NIST_P256.g_y)),
    )
}

/// Scalar multiplication with the base point: scalar · G
///
/// A zero scalar is rejected: no key or nonce may be zero, and 0 · G has
/// no affine coordinates to hand back.
pub fn scalar_mult_base_g(scalar: &Scalar) -> Result<Point> {
    if scalar.is_zero() {
        return Err(Error::scalar("P-256 scalar_mult_base_g", "scalar is zero"));
    }
    Ok(base_point_g().mul(scalar))
}

/// General scalar multiplication: scalar · point
pub fn scalar_mult(scalar: &Scalar, point: &Point) -> Point {
    point.mul(scalar)
}

/// Generate a key pair (d, d·G) with d uniform in [1, n − 1]
pub fn generate_keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Scalar, Point)> {
    let private_key = Scalar::random_nonzero(rng)?;
    let public_key = scalar_mult_base_g(&private_key)?;
    Ok((private_key, public_key))
}
