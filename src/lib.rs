//! # ecsig
//!
//! ECDSA signing over NIST P-256, built from its own field, scalar and curve
//! arithmetic.
//!
//! ## Usage
//!
//! ```
//! use ecsig::prelude::*;
//!
//! let key = EcdsaP256SecretKey::from_bytes(&[0x11; 32])?;
//! let signer = EcdsaP256Signer::new(key, SignerConfig::default())?;
//!
//! let mut signature = [0u8; 64];
//! sign_into(&signer, &mut signature, &[0xAA; 32])?;
//!
//! let digest = Digest32::new([0xAA; 32]);
//! signer
//!     .public_key()
//!     .verify_digest(&digest, &SignatureBytes::new(signature))?;
//! # Ok::<(), ecsig::api::Error>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`SignerConfig`](sign::SignerConfig)
//!   and [`NonceStrategy`](sign::NonceStrategy)
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`ecsig-params`](params): curve constants
//! - [`ecsig-api`](api): errors, boundary types and signer traits
//! - [`ecsig-algorithms`](algorithms): P-256 field, scalar and point arithmetic
//! - [`ecsig-sign`](sign): nonce generation, signing and verification

#![forbid(unsafe_code)]

pub use ecsig_algorithms as algorithms;
pub use ecsig_api as api;
pub use ecsig_params as params;
pub use ecsig_sign as sign;

/// Common imports for ecsig users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export boundary types and traits
    pub use crate::api::{
        sign_into, Digest32, DigestSigner, DigestVerifier, Signature, SignatureBytes,
    };

    // Re-export the P-256 scheme
    pub use crate::sign::{
        EcdsaP256, EcdsaP256PublicKey, EcdsaP256SecretKey, EcdsaP256Signature, EcdsaP256Signer,
        NonceSource, NonceStrategy, SignerConfig,
    };
}
