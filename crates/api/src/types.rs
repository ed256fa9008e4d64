//! Fixed-size boundary types
//!
//! Digests and signatures cross the API as owned arrays. Slices are accepted
//! only through constructors that check the length first.

use crate::{Error, Result};
use core::fmt;
use ecsig_params::traditional::ecdsa::{ECDSA_P256_DIGEST_SIZE, ECDSA_P256_SIGNATURE_SIZE};
use subtle::ConstantTimeEq;

/// Half of a signature: one big-endian component
const COMPONENT_SIZE: usize = ECDSA_P256_SIGNATURE_SIZE / 2;

/// A 32-byte message digest, hashed by the caller
///
/// The bytes are opaque: no hash function is assumed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest32([u8; ECDSA_P256_DIGEST_SIZE]);

impl Digest32 {
    /// Wrap an owned array
    pub const fn new(bytes: [u8; ECDSA_P256_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy from a slice, rejecting anything but exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ECDSA_P256_DIGEST_SIZE {
            return Err(Error::InvalidLength {
                context: "Digest32::from_slice",
                expected: ECDSA_P256_DIGEST_SIZE,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; ECDSA_P256_DIGEST_SIZE];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; ECDSA_P256_DIGEST_SIZE] {
        &self.0
    }
}

impl From<[u8; ECDSA_P256_DIGEST_SIZE]> for Digest32 {
    fn from(bytes: [u8; ECDSA_P256_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Digest32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest32({})", hex::encode(self.0))
    }
}

/// A 64-byte signature: big-endian r (bytes 0..32) then big-endian s
///
/// This container performs no range checks on r and s; scheme-specific
/// signature types validate on conversion.
#[derive(Clone, Copy)]
pub struct SignatureBytes([u8; ECDSA_P256_SIGNATURE_SIZE]);

impl SignatureBytes {
    /// Wrap an owned array
    pub const fn new(bytes: [u8; ECDSA_P256_SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Assemble from the two big-endian components
    pub fn from_components(r: &[u8; COMPONENT_SIZE], s: &[u8; COMPONENT_SIZE]) -> Self {
        let mut out = [0u8; ECDSA_P256_SIGNATURE_SIZE];
        out[..COMPONENT_SIZE].copy_from_slice(r);
        out[COMPONENT_SIZE..].copy_from_slice(s);
        Self(out)
    }

    /// Copy from a slice, rejecting anything but exactly 64 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ECDSA_P256_SIGNATURE_SIZE {
            return Err(Error::InvalidLength {
                context: "SignatureBytes::from_slice",
                expected: ECDSA_P256_SIGNATURE_SIZE,
                actual: bytes.len(),
            });
        }
        let mut out = [0u8; ECDSA_P256_SIGNATURE_SIZE];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// The r component
    pub fn r(&self) -> [u8; COMPONENT_SIZE] {
        let mut r = [0u8; COMPONENT_SIZE];
        r.copy_from_slice(&self.0[..COMPONENT_SIZE]);
        r
    }

    /// The s component
    pub fn s(&self) -> [u8; COMPONENT_SIZE] {
        let mut s = [0u8; COMPONENT_SIZE];
        s.copy_from_slice(&self.0[COMPONENT_SIZE..]);
        s
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; ECDSA_P256_SIGNATURE_SIZE] {
        &self.0
    }

    /// Uppercase hex, 128 characters, no separators
    pub fn to_hex_upper(&self) -> String {
        hex::encode_upper(self.0)
    }
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for SignatureBytes {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SignatureBytes {}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", self.to_hex_upper())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_rejects_short_and_long_slices() {
        assert!(Digest32::from_slice(&[0xAA; 32]).is_ok());
        assert_eq!(
            Digest32::from_slice(&[0xAA; 31]).unwrap_err(),
            Error::InvalidLength {
                context: "Digest32::from_slice",
                expected: 32,
                actual: 31,
            }
        );
        assert!(Digest32::from_slice(&[0xAA; 33]).is_err());
    }

    #[test]
    fn signature_components_split_at_32() {
        let mut raw = [0u8; 64];
        raw[0] = 0x01;
        raw[63] = 0x02;
        let sig = SignatureBytes::new(raw);
        assert_eq!(sig.r()[0], 0x01);
        assert_eq!(sig.s()[31], 0x02);
        assert_eq!(SignatureBytes::from_components(&sig.r(), &sig.s()), sig);
    }

    #[test]
    fn hex_is_uppercase_and_unseparated() {
        let sig = SignatureBytes::new([0xab; 64]);
        let hex = sig.to_hex_upper();
        assert_eq!(hex.len(), 128);
        assert!(hex.chars().all(|c| c == 'A' || c == 'B'));
    }
}
