//! Shared constants and helper functions for P-256 operations

use ecsig_params::traditional::ecdsa::P256_BYTE_LENGTH;

/// Size of a P-256 scalar in bytes (32 bytes = 256 bits)
pub const P256_SCALAR_SIZE: usize = P256_BYTE_LENGTH;

/// Size of a P-256 field element in bytes (32 bytes = 256 bits)
pub const P256_FIELD_ELEMENT_SIZE: usize = P256_BYTE_LENGTH;

/// Size of an uncompressed P-256 point in bytes: format byte (0x04) + x-coordinate + y-coordinate
pub const P256_POINT_UNCOMPRESSED_SIZE: usize = 1 + 2 * P256_FIELD_ELEMENT_SIZE; // 65 bytes: 0x04 || x || y

/// Size of a compressed P-256 point in bytes: format byte (0x02/0x03) + x-coordinate
pub const P256_POINT_COMPRESSED_SIZE: usize = 1 + P256_FIELD_ELEMENT_SIZE; // 33 bytes: 0x02/0x03 || x

/// Number of 32-bit limbs in a field element or scalar
pub(crate) const NLIMBS: usize = 8;

/// Big-endian bytes → little-endian 32-bit limbs, usable in `const` items
pub(crate) const fn be_bytes_to_limbs(bytes: &[u8; 32]) -> [u32; NLIMBS] {
    let mut limbs = [0u32; NLIMBS];
    let mut i = 0;
    while i < NLIMBS {
        // limb-0 holds the 4 least-significant bytes
        let start = (NLIMBS - 1 - i) * 4;
        limbs[i] = u32::from_be_bytes([
            bytes[start],
            bytes[start + 1],
            bytes[start + 2],
            bytes[start + 3],
        ]);
        i += 1;
    }
    limbs
}

/// Little-endian 32-bit limbs → big-endian bytes
#[inline(always)]
pub(crate) fn limbs_to_be_bytes(limbs: &[u32; NLIMBS]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        let start = (NLIMBS - 1 - i) * 4;
        out[start..start + 4].copy_from_slice(&limb.to_be_bytes());
    }
    out
}

/// 8-limb addition with carry
#[inline(always)]
pub(crate) fn adc8(a: &[u32; NLIMBS], b: &[u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
    let mut r = [0u32; NLIMBS];
    let mut carry = 0u64;
    for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
        let tmp = (a_limb as u64) + (b_limb as u64) + carry;
        *r_limb = tmp as u32;
        carry = tmp >> 32;
    }
    (r, carry as u32)
}

/// 8-limb subtraction with borrow; borrow is 1 iff a < b
#[inline(always)]
pub(crate) fn sbb8(a: &[u32; NLIMBS], b: &[u32; NLIMBS]) -> ([u32; NLIMBS], u32) {
    let mut r = [0u32; NLIMBS];
    let mut borrow = 0u64;
    for ((&a_limb, &b_limb), r_limb) in a.iter().zip(b.iter()).zip(r.iter_mut()) {
        let tmp = (a_limb as u64)
            .wrapping_sub(b_limb as u64)
            .wrapping_sub(borrow);
        *r_limb = tmp as u32;
        borrow = (tmp >> 63) & 1;
    }
    (r, borrow as u32)
}

/// Schoolbook 8×8 → 16-limb product
#[inline(always)]
pub(crate) fn mul_wide(a: &[u32; NLIMBS], b: &[u32; NLIMBS]) -> [u32; 2 * NLIMBS] {
    let mut t = [0u128; 2 * NLIMBS];
    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            t[i + j] += (ai as u128) * (bj as u128);
        }
    }

    let mut wide = [0u32; 2 * NLIMBS];
    let mut carry: u128 = 0;
    for (w, &acc) in wide.iter_mut().zip(t.iter()) {
        let v = acc + carry;
        *w = v as u32;
        carry = v >> 32;
    }
    wide
}
