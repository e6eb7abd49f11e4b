//! Backend related error types

use thiserror::Error;

/// Errors raised by a credential backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be initialised on this machine
    #[error("Credential backend '{backend}' is unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    /// A read, write or remove against an initialised backend failed
    #[error("Credential backend '{backend}' failed to {operation}: {message}")]
    Operation {
        backend: String,
        operation: String,
        message: String,
    },

    /// The credential document could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl BackendError {
    /// Create a backend unavailable error
    pub fn unavailable(backend: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a backend operation error
    pub fn operation(backend: &str, operation: &str, message: impl Into<String>) -> Self {
        Self::Operation {
            backend: backend.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error() {
        let error = BackendError::unavailable("keyring", "no secret service");
        assert!(error.to_string().contains("keyring"));
        assert!(error.to_string().contains("unavailable"));
        assert!(error.to_string().contains("no secret service"));
    }

    #[test]
    fn test_operation_error() {
        let error = BackendError::operation("keyring", "write", "locked");
        assert_eq!(
            error.to_string(),
            "Credential backend 'keyring' failed to write: locked"
        );
    }
}
