//! Elliptic curve arithmetic for ecsig
//!
//! This crate provides the NIST P-256 building blocks the signer is made of:
//! field arithmetic modulo p, scalar arithmetic modulo the group order n,
//! and point operations on the short Weierstrass curve.
//!
//! # Security Notes
//!
//! - Scalars are zeroized on drop and never printed
//! - Field and scalar reductions use constant-time selection
//! - Scalar multiplication uses a fixed 4-bit window with full-table scans;
//!   the group law itself still branches on the identity, so this is not an
//!   audited constant-time implementation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

// Error module and re-exports
pub mod error;
pub use error::{validate, Error, Result};

// Elliptic Curve primitives
pub mod ec;
pub use ec::{p256, P256Point, P256Scalar};
