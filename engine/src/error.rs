//! Error types for the carousel engine.

use thiserror::Error;

/// All possible errors from a record store or the components using it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Store errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("store rejected request ({status}): {message}")]
    StoreRejection { status: u16, message: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    // State errors
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Shorthand for a rejection with the given status.
    pub fn rejection(status: u16, message: impl Into<String>) -> Self {
        Self::StoreRejection {
            status,
            message: message.into(),
        }
    }

    /// Check if the store answered that the target does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StoreRejection { status: 404, .. })
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = Error::rejection(404, "item does not exist");
        assert_eq!(
            err.to_string(),
            "store rejected request (404): item does not exist"
        );
        assert!(err.is_not_found());

        let err = Error::InvalidState("no record is being edited".into());
        assert_eq!(err.to_string(), "invalid state: no record is being edited");
        assert!(!err.is_not_found());
    }
}
