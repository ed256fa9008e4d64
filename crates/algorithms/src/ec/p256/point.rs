//! P-256 elliptic curve point operations

use crate::ec::p256::{
    constants::{P256_FIELD_ELEMENT_SIZE, P256_POINT_COMPRESSED_SIZE, P256_POINT_UNCOMPRESSED_SIZE},
    field::FieldElement,
    scalar::Scalar,
};
use crate::error::{validate, Error, Result};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Format of a serialized elliptic‐curve point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFormat {
    /// Identity point (all zeros)
    Identity,
    /// Uncompressed: 0x04 ∥ x ∥ y
    Uncompressed,
    /// Compressed: 0x02/0x03 ∥ x
    Compressed,
}

/// Affine coordinates (x, y) or the identity
#[derive(Clone, Debug)]
pub struct Point {
    pub(crate) is_identity: Choice,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
}

/// Jacobian coordinates (X:Y:Z) for efficient arithmetic
#[derive(Clone, Debug)]
pub(crate) struct ProjectivePoint {
    pub(crate) is_identity: Choice,
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

/// Window width of the fixed-window scalar multiplication
const WINDOW_BITS: usize = 4;
const WINDOW_SIZE: usize = 1 << WINDOW_BITS;

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        let a_id: bool = self.is_identity.into();
        let b_id: bool = other.is_identity.into();
        if a_id || b_id {
            return a_id == b_id;
        }
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl Point {
    /// Create a new affine point from uncompressed byte coordinates
    pub fn new_uncompressed(
        x_bytes: &[u8; P256_FIELD_ELEMENT_SIZE],
        y_bytes: &[u8; P256_FIELD_ELEMENT_SIZE],
    ) -> Result<Self> {
        let x_fe = FieldElement::from_bytes(x_bytes)
            .map_err(|_| Error::point("P-256 Point", "x not in field"))?;
        let y_fe = FieldElement::from_bytes(y_bytes)
            .map_err(|_| Error::point("P-256 Point", "y not in field"))?;
        let point = Self::from_affine_unchecked(x_fe, y_fe);
        if !point.is_on_curve() {
            return Err(Error::point("P-256 Point", "point not on curve"));
        }
        Ok(point)
    }

    /// Wrap coordinates without checking the curve equation
    pub(crate) fn from_affine_unchecked(x: FieldElement, y: FieldElement) -> Self {
        Point {
            is_identity: Choice::from(0),
            x,
            y,
        }
    }

    /// The identity (point at infinity)
    pub fn identity() -> Self {
        Point {
            is_identity: Choice::from(1),
            x: FieldElement::zero(),
            y: FieldElement::zero(),
        }
    }

    /// Is this the identity point?
    pub fn is_identity(&self) -> bool {
        self.is_identity.into()
    }

    /// The affine x-coordinate (zero for the identity)
    pub fn x(&self) -> &FieldElement {
        &self.x
    }

    /// The affine y-coordinate (zero for the identity)
    pub fn y(&self) -> &FieldElement {
        &self.y
    }

    /// Extract x‐coordinate as big‐endian bytes
    pub fn x_coordinate_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        self.x.to_bytes()
    }

    /// Extract y‐coordinate as big‐endian bytes
    pub fn y_coordinate_bytes(&self) -> [u8; P256_FIELD_ELEMENT_SIZE] {
        self.y.to_bytes()
    }

    /// Does this point satisfy y² = x³ − 3x + b? The identity counts as valid.
    pub fn is_on_curve(&self) -> bool {
        if self.is_identity() {
            return true;
        }
        self.y.square() == Self::curve_rhs(&self.x)
    }

    /// Detect serialized point format
    pub fn detect_format(bytes: &[u8]) -> Result<PointFormat> {
        if bytes.is_empty() {
            return Err(Error::point("P-256 Point", "empty encoding"));
        }
        match (bytes[0], bytes.len()) {
            (0x00, P256_POINT_UNCOMPRESSED_SIZE) | (0x00, P256_POINT_COMPRESSED_SIZE) => {
                // all‐zeros encoding = identity
                if bytes.iter().all(|&b| b == 0) {
                    Ok(PointFormat::Identity)
                } else {
                    Err(Error::point("P-256 Point", "invalid identity encoding"))
                }
            }
            (0x04, P256_POINT_UNCOMPRESSED_SIZE) => Ok(PointFormat::Uncompressed),
            (0x02 | 0x03, P256_POINT_COMPRESSED_SIZE) => Ok(PointFormat::Compressed),
            _ => Err(Error::point("P-256 Point", "unknown or malformed format")),
        }
    }

    /// Parse any SEC1 encoding this module produces
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        match Self::detect_format(bytes)? {
            PointFormat::Identity => Ok(Self::identity()),
            PointFormat::Uncompressed => Self::deserialize_uncompressed(bytes),
            PointFormat::Compressed => Self::deserialize_compressed(bytes),
        }
    }

    /// Serialize this point as uncompressed: 0x04 ∥ x ∥ y
    pub fn serialize_uncompressed(&self) -> [u8; P256_POINT_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; P256_POINT_UNCOMPRESSED_SIZE];
        if self.is_identity() {
            return out; // all zeros
        }
        out[0] = 0x04;
        out[1..1 + P256_FIELD_ELEMENT_SIZE].copy_from_slice(&self.x.to_bytes());
        out[1 + P256_FIELD_ELEMENT_SIZE..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Deserialize from uncompressed bytes (0x04 ∥ x ∥ y), or all‐zeros for identity
    pub fn deserialize_uncompressed(bytes: &[u8]) -> Result<Self> {
        validate::length("P-256 Point", bytes.len(), P256_POINT_UNCOMPRESSED_SIZE)?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::identity());
        }
        if bytes[0] != 0x04 {
            return Err(Error::point("P-256 Point", "invalid prefix for uncompressed"));
        }
        let mut xb = [0u8; P256_FIELD_ELEMENT_SIZE];
        let mut yb = [0u8; P256_FIELD_ELEMENT_SIZE];
        xb.copy_from_slice(&bytes[1..1 + P256_FIELD_ELEMENT_SIZE]);
        yb.copy_from_slice(&bytes[1 + P256_FIELD_ELEMENT_SIZE..]);
        Self::new_uncompressed(&xb, &yb)
    }

    /// Serialize this point in compressed form: 0x02/0x03 ∥ x
    pub fn serialize_compressed(&self) -> [u8; P256_POINT_COMPRESSED_SIZE] {
        let mut out = [0u8; P256_POINT_COMPRESSED_SIZE];
        if self.is_identity() {
            return out; // all zeros
        }
        out[0] = if self.y.is_odd() { 0x03 } else { 0x02 };
        out[1..].copy_from_slice(&self.x.to_bytes());
        out
    }

    /// Deserialize from compressed bytes (0x02/0x03 ∥ x) or all‐zeros for identity
    pub fn deserialize_compressed(bytes: &[u8]) -> Result<Self> {
        validate::length(
            "P-256 Compressed Point",
            bytes.len(),
            P256_POINT_COMPRESSED_SIZE,
        )?;
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Self::identity());
        }
        let tag = bytes[0];
        if tag != 0x02 && tag != 0x03 {
            return Err(Error::point("P-256 Point", "invalid compressed prefix"));
        }
        let mut xb = [0u8; P256_FIELD_ELEMENT_SIZE];
        xb.copy_from_slice(&bytes[1..]);
        let x_fe = FieldElement::from_bytes(&xb)
            .map_err(|_| Error::point("P-256 Point", "x not in field"))?;
        let y_candidate = Self::curve_rhs(&x_fe)
            .sqrt()
            .ok_or_else(|| Error::point("P-256 Point", "x is a non-residue"))?;
        let want_odd = tag == 0x03;
        let y_final = if y_candidate.is_odd() == want_odd {
            y_candidate
        } else {
            y_candidate.negate()
        };
        Ok(Self::from_affine_unchecked(x_fe, y_final))
    }

    /// Add two points (group law)
    ///
    /// P + O = P, P + (−P) = O, and P + P is routed to doubling.
    pub fn add(&self, other: &Self) -> Self {
        let p1 = self.to_projective();
        let p2 = other.to_projective();
        p1.add(&p2).to_affine()
    }

    /// Double this point: 2P
    pub fn double(&self) -> Self {
        self.to_projective().double().to_affine()
    }

    /// Additive inverse: (x, −y)
    pub fn negate(&self) -> Self {
        if self.is_identity() {
            return Self::identity();
        }
        Self::from_affine_unchecked(self.x, self.y.negate())
    }

    /// Scalar multiplication: scalar · P
    ///
    /// Fixed 4-bit windows, most significant first. Each window does four
    /// doublings and one addition of a table entry selected by scanning the
    /// whole table with constant-time selection. 0 · P is the identity.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        if self.is_identity() {
            return Self::identity();
        }

        let base = self.to_projective();
        let mut table: [ProjectivePoint; WINDOW_SIZE] =
            core::array::from_fn(|_| ProjectivePoint::identity());
        for i in 1..WINDOW_SIZE {
            table[i] = table[i - 1].add(&base);
        }

        let mut acc = ProjectivePoint::identity();
        for window in (0..256 / WINDOW_BITS).rev() {
            for _ in 0..WINDOW_BITS {
                acc = acc.double();
            }
            let digit = scalar.nibble(window);
            let mut entry = ProjectivePoint::identity();
            for (i, candidate) in table.iter().enumerate() {
                let hit = (i as u8).ct_eq(&digit);
                entry = ProjectivePoint::conditional_select(&entry, candidate, hit);
            }
            acc = acc.add(&entry);
        }
        acc.to_affine()
    }

    /// u1·G + u2·Q style double multiplication
    pub fn mul_add(&self, a: &Scalar, other: &Self, b: &Scalar) -> Self {
        let lhs = self.mul(a).to_projective();
        let rhs = other.mul(b).to_projective();
        lhs.add(&rhs).to_affine()
    }

    /// x³ − 3x + b
    fn curve_rhs(x: &FieldElement) -> FieldElement {
        let x3 = x.square().mul(x);
        let ax = FieldElement::a().mul(x);
        x3.add(&ax).add(&FieldElement::b())
    }

    /// Convert affine to Jacobian for intermediate computations
    fn to_projective(&self) -> ProjectivePoint {
        if self.is_identity() {
            ProjectivePoint::identity()
        } else {
            ProjectivePoint {
                is_identity: Choice::from(0),
                x: self.x,
                y: self.y,
                z: FieldElement::one(),
            }
        }
    }
}

impl ProjectivePoint {
    /// Identity in Jacobian form: (1 : 1 : 0)
    pub fn identity() -> Self {
        ProjectivePoint {
            is_identity: Choice::from(1),
            x: FieldElement::one(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    /// Constant-time select: `a` if `choice` is 0, `b` if it is 1
    pub fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            is_identity: Choice::conditional_select(&a.is_identity, &b.is_identity, choice),
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }

    /// Point addition (Jacobian coordinates)
    pub fn add(&self, other: &Self) -> Self {
        // Handle identity cases
        if self.is_identity.into() {
            return other.clone();
        }
        if other.is_identity.into() {
            return self.clone();
        }

        // Z₁², Z₂², Z₁³, Z₂³
        let z1_sq = self.z.square();
        let z2_sq = other.z.square();
        let z1_cu = z1_sq.mul(&self.z);
        let z2_cu = z2_sq.mul(&other.z);

        let u1 = self.x.mul(&z2_sq); // X₁·Z₂²
        let u2 = other.x.mul(&z1_sq); // X₂·Z₁²
        let s1 = self.y.mul(&z2_cu); // Y₁·Z₂³
        let s2 = other.y.mul(&z1_cu); // Y₂·Z₁³

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            // Same x: either the same point or inverses
            if r.is_zero() {
                return self.double();
            } else {
                return ProjectivePoint::identity();
            }
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);
        let v = u1.mul(&h2);

        // X₃ = r² − h³ − 2v
        let x3 = r.square().sub(&h3).sub(&v.double());

        // Y₃ = r·(v − X₃) − s1·h³
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&h3));

        // Z₃ = Z₁·Z₂·h
        let z3 = self.z.mul(&other.z).mul(&h);

        ProjectivePoint {
            is_identity: Choice::from(0),
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Point doubling (Jacobian coordinates, a = −3)
    pub fn double(&self) -> Self {
        if self.is_identity.into() {
            return self.clone();
        }
        if self.y.is_zero() {
            return ProjectivePoint::identity();
        }

        //   δ  = Z²
        //   γ  = Y²
        //   β  = X·γ
        //   α  = 3·(X − δ)·(X + δ)
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x.mul(&gamma);

        let t1 = self.x.add(&delta);
        let t2 = self.x.sub(&delta);
        let alpha = t1.mul(&t2).mul(&FieldElement::from_u32(3));

        // X₃ = α² − 8·β
        let four_beta = beta.double().double();
        let x3 = alpha.square().sub(&four_beta.double());

        // Z₃ = (Y + Z)² − γ − δ
        let z3 = self.y.add(&self.z).square().sub(&gamma).sub(&delta);

        // Y₃ = α·(4·β − X₃) − 8·γ²
        let eight_gamma_sq = gamma.square().double().double().double();
        let y3 = alpha.mul(&four_beta.sub(&x3)).sub(&eight_gamma_sq);

        ProjectivePoint {
            is_identity: Choice::from(0),
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Convert Jacobian back to affine coordinates
    pub fn to_affine(&self) -> Point {
        if self.is_identity.into() {
            return Point::identity();
        }
        // Z = 0 is the point at infinity in Jacobian form
        let z_inv = match self.z.invert() {
            Ok(z_inv) => z_inv,
            Err(_) => return Point::identity(),
        };
        let z_inv_sq = z_inv.square();
        let z_inv_cu = z_inv_sq.mul(&z_inv);
        Point::from_affine_unchecked(self.x.mul(&z_inv_sq), self.y.mul(&z_inv_cu))
    }
}
