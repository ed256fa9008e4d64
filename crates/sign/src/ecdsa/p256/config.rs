//! Signer configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cap on nonce draws per signature
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// How the ephemeral scalar k is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NonceStrategy {
    /// RFC 6979 deterministic nonces
    #[default]
    Deterministic,
    /// RFC 6979 with 32 bytes of fresh entropy per signature
    Hedged,
    /// Uniform random nonces
    Random,
}

/// Tunables for [`EcdsaP256Signer`](super::EcdsaP256Signer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SignerConfig {
    /// Nonce generation strategy
    pub nonce: NonceStrategy,
    /// Maximum number of nonces drawn before giving up with `NonceExhausted`
    ///
    /// Zero behaves as one: every signing call draws at least one nonce.
    pub max_attempts: u32,
    /// Verify every signature against the derived public key before release
    pub verify_after_sign: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            nonce: NonceStrategy::Deterministic,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            verify_after_sign: true,
        }
    }
}

impl SignerConfig {
    /// Set the nonce strategy
    pub fn with_nonce(mut self, nonce: NonceStrategy) -> Self {
        self.nonce = nonce;
        self
    }

    /// Set the retry cap; zero is clamped to one
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Enable or disable the post-sign self check
    pub fn with_verify_after_sign(mut self, enabled: bool) -> Self {
        self.verify_after_sign = enabled;
        self
    }
}
