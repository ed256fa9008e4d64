//! Error handling for curve arithmetic

use std::borrow::Cow;
use std::fmt;

use ecsig_api::Error as ApiError;

/// The error type for arithmetic primitives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parameter validation error
    Parameter {
        /// Name of the invalid parameter
        name: Cow<'static, str>,
        /// Reason why the parameter is invalid
        reason: Cow<'static, str>,
    },

    /// Length validation error
    Length {
        /// Context where the length error occurred
        context: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// Inverse of zero requested
    InvalidInverse {
        /// Element type that was inverted
        context: &'static str,
    },

    /// Scalar outside the range an operation requires
    InvalidScalar {
        /// Operation that rejected the scalar
        context: &'static str,
        /// Why
        reason: &'static str,
    },

    /// Point encoding or coordinates not on the curve
    InvalidPoint {
        /// Operation that rejected the point
        context: &'static str,
        /// Why
        reason: &'static str,
    },

    /// The random source failed or never produced a usable value
    Entropy {
        /// Operation that was sampling
        context: &'static str,
        /// Underlying failure
        reason: Cow<'static, str>,
    },
}

impl Error {
    /// Shorthand to create a Parameter error
    pub fn param<N: Into<Cow<'static, str>>, R: Into<Cow<'static, str>>>(
        name: N,
        reason: R,
    ) -> Self {
        Error::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand to create an InvalidScalar error
    pub fn scalar(context: &'static str, reason: &'static str) -> Self {
        Error::InvalidScalar { context, reason }
    }

    /// Shorthand to create an InvalidPoint error
    pub fn point(context: &'static str, reason: &'static str) -> Self {
        Error::InvalidPoint { context, reason }
    }

    /// Shorthand to create an Entropy error
    pub fn entropy<R: Into<Cow<'static, str>>>(context: &'static str, reason: R) -> Self {
        Error::Entropy {
            context,
            reason: reason.into(),
        }
    }
}

/// Result type for arithmetic primitives
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            Error::Length {
                context,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid length for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            Error::InvalidInverse { context } => {
                write!(f, "{}: inverse of zero", context)
            }
            Error::InvalidScalar { context, reason } => {
                write!(f, "{}: invalid scalar: {}", context, reason)
            }
            Error::InvalidPoint { context, reason } => {
                write!(f, "{}: invalid point: {}", context, reason)
            }
            Error::Entropy { context, reason } => {
                write!(f, "{}: randomness unavailable: {}", context, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Parameter { name, reason } => ApiError::InvalidParameter {
                context: match name {
                    Cow::Borrowed(s) => s,
                    Cow::Owned(_) => "curve arithmetic",
                },
                message: reason.into_owned(),
            },
            Error::Length {
                context,
                expected,
                actual,
            } => ApiError::InvalidLength {
                context,
                expected,
                actual,
            },
            Error::InvalidInverse { context } => ApiError::InvalidInverse { context },
            Error::InvalidScalar { context, reason } => ApiError::InvalidScalar {
                context,
                message: reason.to_string(),
            },
            Error::InvalidPoint { context, reason } => ApiError::InvalidPoint {
                context,
                message: reason.to_string(),
            },
            Error::Entropy { context, reason } => ApiError::EntropyUnavailable {
                context,
                message: reason.into_owned(),
            },
        }
    }
}

// Include the validation submodule
pub mod validate;
