//! Public API traits and types for the ecsig library
//!
//! This crate is the boundary every other ecsig crate agrees on: the public
//! error taxonomy, the fixed-size digest and signature containers, and the
//! signer/verifier traits that callers program against.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result};
pub use traits::{sign_into, DigestSigner, DigestVerifier, Signature};
pub use types::{Digest32, SignatureBytes};
