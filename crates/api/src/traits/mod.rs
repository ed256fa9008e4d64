//! Trait definitions for signature schemes and signers

pub mod signature;

pub use signature::{sign_into, DigestSigner, DigestVerifier, Signature};
