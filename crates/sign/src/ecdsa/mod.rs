//! ECDSA signature implementations
//!
//! Only the NIST P-256 curve is provided.

pub mod p256;

// Re-export P-256 types
pub use p256::{
    EcdsaP256, EcdsaP256PublicKey, EcdsaP256SecretKey, EcdsaP256Signature, EcdsaP256Signer,
    FaultModel, FaultPair, NonceSource, NonceStrategy, ObservedSignature, RandomNonce,
    Rfc6979Nonce, SignerConfig,
};
