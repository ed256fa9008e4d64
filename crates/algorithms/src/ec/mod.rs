//! Elliptic Curve Primitives
//!
//! Arithmetic for the NIST P-256 curve, split into constants, field,
//! scalar and point modules.

pub mod p256;

pub use p256::{Point as P256Point, Scalar as P256Scalar};
