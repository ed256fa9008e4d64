//! Error type definitions for signing operations

use thiserror::Error as ThisError;

/// Primary error type for ecsig operations
///
/// The variants are the public failure taxonomy. Primitive-level errors from
/// the arithmetic crates convert into these without losing their kind.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// Multiplicative inverse of zero was requested
    #[error("{context}: inverse of zero requested")]
    InvalidInverse {
        /// Operation that requested the inverse
        context: &'static str,
    },

    /// Zero or out-of-range scalar where a value in [1, n-1] is required
    #[error("{context}: invalid scalar: {message}")]
    InvalidScalar {
        /// Operation that rejected the scalar
        context: &'static str,
        /// Why it was rejected
        message: String,
    },

    /// Encoding or coordinates that do not describe a point on the curve
    #[error("{context}: invalid point: {message}")]
    InvalidPoint {
        /// Operation that rejected the point
        context: &'static str,
        /// Why it was rejected
        message: String,
    },

    /// Buffer of the wrong size at an API boundary
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        /// Buffer being validated
        context: &'static str,
        /// Required size in bytes
        expected: usize,
        /// Supplied size in bytes
        actual: usize,
    },

    /// Any other rejected input
    #[error("{context}: {message}")]
    InvalidParameter {
        /// Parameter or operation name
        context: &'static str,
        /// Why it was rejected
        message: String,
    },

    /// The randomized nonce path could not obtain secure randomness
    #[error("{context}: secure randomness unavailable: {message}")]
    EntropyUnavailable {
        /// Entropy consumer
        context: &'static str,
        /// Underlying source error
        message: String,
    },

    /// The signing retry cap was exceeded
    ///
    /// Unrecoverable: it indicates a broken random source or corrupted
    /// curve constants.
    #[error("nonce generation exhausted after {attempts} attempts")]
    NonceExhausted {
        /// Number of signing attempts made
        attempts: u32,
    },

    /// Signature rejected by verification
    #[error("Invalid signature: {context}: {message}")]
    InvalidSignature {
        /// Verification stage
        context: &'static str,
        /// Why it was rejected
        message: String,
    },

    /// A freshly computed signature failed its own consistency check
    #[error("{context}: computation fault detected, signature withheld")]
    FaultDetected {
        /// Check that failed
        context: &'static str,
    },
}

/// Result type for ecsig operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Replace the context of an existing error, keeping its kind and message
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::InvalidInverse { .. } => Self::InvalidInverse { context },
            Self::InvalidScalar { message, .. } => Self::InvalidScalar { context, message },
            Self::InvalidPoint { message, .. } => Self::InvalidPoint { context, message },
            Self::InvalidLength {
                expected, actual, ..
            } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            Self::EntropyUnavailable { message, .. } => {
                Self::EntropyUnavailable { context, message }
            }
            Self::NonceExhausted { attempts } => Self::NonceExhausted { attempts },
            Self::InvalidSignature { message, .. } => Self::InvalidSignature { context, message },
            Self::FaultDetected { .. } => Self::FaultDetected { context },
        }
    }

    /// Whether repeating the same call can succeed
    ///
    /// Only entropy starvation is transient. Everything else is either a
    /// caller error or a fatal fault.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EntropyUnavailable { .. })
    }
}
