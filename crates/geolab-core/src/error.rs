//! Error types for dispatch and primitive evaluation
//!
//! Provides a unified error type for all geolab crates.

use thiserror::Error;

/// Core error type for registry and primitive operations
#[derive(Error, Debug)]
pub enum Error {
    /// An identical signature is already registered for the operation
    #[error("Duplicate registration: `{operation}` already has an entry for {signature}")]
    DuplicateRegistration { operation: String, signature: String },

    /// A registration was rejected before it reached the dispatch table
    #[error("Invalid registration for `{operation}`: {reason}")]
    InvalidRegistration { operation: String, reason: String },

    /// No registered entry accepts the runtime argument types
    #[error("No implementation of `{operation}` matches argument types ({arguments})")]
    NoMatchingImplementation { operation: String, arguments: String },

    /// Two or more entries match with equal, maximal specificity
    #[error("Ambiguous dispatch for `{operation}` with ({arguments}): candidates {candidates:?}")]
    AmbiguousDispatch {
        operation: String,
        arguments: String,
        candidates: Vec<String>,
    },

    /// Invalid parameter combination at a collaborator boundary
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An implementation received an argument payload it cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failure raised by the host numerical library, carried unchanged
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a missing keyword argument
    pub fn missing_keyword(name: &str) -> Self {
        Self::InvalidArgument(format!("missing keyword argument `{name}`"))
    }

    /// Create an error for a payload of the wrong type
    pub fn type_mismatch(position: &str, expected: &str, actual: &str) -> Self {
        Self::InvalidArgument(format!(
            "{position}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for a shape the host routine cannot accept
    pub fn shape(context: &str, detail: impl std::fmt::Display) -> Self {
        Self::Backend(anyhow::anyhow!("{context}: {detail}"))
    }

    /// Whether this error was produced by the dispatch layer itself
    pub fn is_dispatch_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRegistration { .. }
                | Self::InvalidRegistration { .. }
                | Self::NoMatchingImplementation { .. }
                | Self::AmbiguousDispatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateRegistration {
            operation: "qr".to_string(),
            signature: "(f64)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate registration: `qr` already has an entry for (f64)"
        );

        let err = Error::NoMatchingImplementation {
            operation: "cumsum".to_string(),
            arguments: "alloc::string::String".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No implementation of `cumsum` matches argument types (alloc::string::String)"
        );

        let err = Error::Configuration("nu must be finite".to_string());
        assert_eq!(err.to_string(), "Configuration error: nu must be finite");

        let err = Error::InvalidArgument("axis out of range".to_string());
        assert_eq!(err.to_string(), "Invalid argument: axis out of range");
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::missing_keyword("k");
        assert_eq!(err.to_string(), "Invalid argument: missing keyword argument `k`");

        let err = Error::type_mismatch("argument 0", "f64", "i32");
        assert_eq!(err.to_string(), "Invalid argument: argument 0: expected f64, got i32");

        let err = Error::shape("qr", "expected a 2-d array, got 3 dimensions");
        assert!(matches!(err, Error::Backend(_)));
        assert!(err.to_string().contains("expected a 2-d array"));
    }

    #[test]
    fn test_error_from_anyhow() {
        let anyhow_err = anyhow::anyhow!("matrix is singular");
        let err: Error = anyhow_err.into();

        match err {
            Error::Backend(_) => {
                assert!(err.to_string().contains("matrix is singular"));
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_dispatch_error_classification() {
        let err = Error::AmbiguousDispatch {
            operation: "norm".to_string(),
            arguments: "f64".to_string(),
            candidates: vec!["(A)".to_string(), "(B)".to_string()],
        };
        assert!(err.is_dispatch_error());
        assert!(!Error::Configuration("x".to_string()).is_dispatch_error());
        assert!(!Error::Backend(anyhow::anyhow!("x")).is_dispatch_error());
    }
}
