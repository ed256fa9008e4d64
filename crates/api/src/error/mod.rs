//! Error handling for the public API

pub mod types;

// Re-export the primary error type and result
pub use types::{Error, Result};

impl From<rand::Error> for Error {
    fn from(e: rand::Error) -> Self {
        Self::EntropyUnavailable {
            context: "random source",
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_context() {
        let err = Error::InvalidLength {
            context: "sign_into digest",
            expected: 32,
            actual: 31,
        };
        assert_eq!(
            err.to_string(),
            "sign_into digest: invalid length (expected 32, got 31)"
        );

        let err = Error::NonceExhausted { attempts: 10 };
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn with_context_keeps_the_variant() {
        let err = Error::InvalidScalar {
            context: "inner",
            message: "zero".to_string(),
        }
        .with_context("outer");
        match err {
            Error::InvalidScalar { context, message } => {
                assert_eq!(context, "outer");
                assert_eq!(message, "zero");
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn rng_failure_is_entropy_unavailable() {
        let err = Error::from(rand::Error::new("device gone"));
        match err {
            Error::EntropyUnavailable { context, message } => {
                assert_eq!(context, "random source");
                assert!(message.contains("device gone"));
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(!Error::NonceExhausted { attempts: 3 }.is_retryable());
        assert!(Error::EntropyUnavailable {
            context: "os",
            message: String::new(),
        }
        .is_retryable());
        assert!(!Error::FaultDetected { context: "sign" }.is_retryable());
    }
}
