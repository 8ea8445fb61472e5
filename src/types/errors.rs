//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Every variant maps onto one of the four
//! caller-visible classes reported by [`Error::kind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the dispatch core.
#[derive(Error, Debug)]
pub enum Error {
    /// Contract violation, raised before any handler runs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown tool name or unknown documentation lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// Failure raised by an external business-logic collaborator.
    #[error("handler error: {0}")]
    Handler(String),

    /// Configuration defects (missing contract, unbound handler, catalog drift).
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-visible error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Handler,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Handler => "handler",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify the error for logging and audit metadata.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Handler(_) => ErrorKind::Handler,
            Error::Internal(_) | Error::Serialization(_) | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Message without the class prefix, as placed in a failure envelope.
    pub fn message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Handler(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Serialization(e) => e.to_string(),
            Error::Io(e) => e.to_string(),
        }
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Error::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(Error::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(Error::handler("x").kind(), ErrorKind::Handler);
        assert_eq!(Error::internal("x").kind(), ErrorKind::Internal);

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_display_keeps_message() {
        let err = Error::not_found("Unknown tool: nope");
        assert_eq!(err.to_string(), "not found: Unknown tool: nope");
        assert_eq!(err.message(), "Unknown tool: nope");
    }
}
