//! Known-answer vectors for ECDSA P-256 with SHA-256 digests

/// RFC 6979 A.2.5 private key x
pub const RFC6979_KEY: &str = "C9AFA9D845BA75166B5C215767B1D6934E50C3DB36E89B127B8A622B120F6721";

/// RFC 6979 A.2.5 public key (Ux, Uy)
pub const RFC6979_PUBLIC: (&str, &str) = (
    "60FED4BA255A9D31C961EB74C6356D68C049B8923B61FA6CE669622E60F29FB6",
    "7903FE1008B8BC99A41AE9E95628BC64F2F1B20C2D7E9F5177A3C294D4462299",
);

/// A deterministic signing vector over SHA-256(message)
pub struct SigningVector {
    /// Message hashed with SHA-256 to form the digest
    pub message: &'static [u8],
    /// Expected nonce k
    pub k: &'static str,
    /// Expected r
    pub r: &'static str,
    /// Expected s
    pub s: &'static str,
}

/// RFC 6979 A.2.5, SHA-256 rows
pub const RFC6979_SHA256: &[SigningVector] = &[
    SigningVector {
        message: b"sample",
        k: "A6E3C57DD01ABE90086538398355DD4C3B17AA873382B0F24D6129493D8AAD60",
        r: "EFD48B2AACB6A8FD1140DD9CD45E81D69D2C877B56AAF991C34D0EA84EAF3716",
        s: "F7CB1C942D657C41D436C7A1B6E29F65F3E900DBB9AFF4064DC4AB2F843ACDA8",
    },
    SigningVector {
        message: b"test",
        k: "D16B6AE827F17175E040871A1C7EC3500192C4C92677336EC2537ACAEE0008E0",
        r: "F1ABB023518351CD71D881567B1EA663ED3EFCF6C5132B354F28D3B0B7D38367",
        s: "019F4113742A2B14BD25926B49C649155F267E60D3814B4C0CC84250E46F0083",
    },
];

/// The fixed harness digest: 32 bytes of 0xAA
pub const FIXED_DIGEST: [u8; 32] = [0xAA; 32];

/// Signature of [`FIXED_DIGEST`] under [`RFC6979_KEY`], as the harness prints it
pub const FIXED_SIGNATURE_HEX: &str = concat!(
    "D18944623F9ECD610271A27D6E5F88086B95CCF8DEB487EEACDEAF00DA97713B",
    "D3F2D64F73DB5A4D76B5E901B3DB0E2835CB6157439A1BE9B065ABAA105F8F3E",
);

/// Decode a 64-character hex string into 32 bytes
pub fn bytes32(hex_str: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut out).expect("fixture hex must be 32 bytes");
    out
}
