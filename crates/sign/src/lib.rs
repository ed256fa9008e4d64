//! Digital Signature Schemes
//!
//! ECDSA over NIST P-256 with RFC 6979, hedged or random nonces, a bounded
//! retry loop and an optional post-sign self check. The [`fault`] module
//! recovers keys from faulty signatures and checks signers for determinism.
//!
//! Events are emitted through `tracing` (retries at `debug`, exhausted
//! attempts and detected faults at `warn`). No subscriber is installed here
//! and secret values never appear in events.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ecdsa;

pub use ecdsa::p256::fault;

pub use ecdsa::{
    EcdsaP256, EcdsaP256PublicKey, EcdsaP256SecretKey, EcdsaP256Signature, EcdsaP256Signer,
    FaultModel, FaultPair, NonceSource, NonceStrategy, ObservedSignature, RandomNonce,
    Rfc6979Nonce, SignerConfig,
};
